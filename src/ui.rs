use colored::Colorize;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a step indicator
pub fn step(num: usize, total: usize, msg: &str) {
    println!("{} {}", format!("[{num}/{total}]").blue().bold(), msg);
}

/// Human label for an item kind
pub fn resource_label(resource_type: &str) -> &str {
    match resource_type {
        "hostname" => "Hostname",
        "network_instance" => "Network instances",
        "l2_interface" => "L2 interfaces",
        "l3_interface" => "L3 interfaces",
        "prefix_set" => "Prefix sets",
        "policy" => "Routing policies",
        "next_hop_group" => "Next-hop groups",
        "static_route" => "Static routes",
        "bgp" => "BGP",
        "ospf" => "OSPF",
        other => other,
    }
}

/// Pluralize a count with a noun
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
