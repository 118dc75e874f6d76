use console::style;

use crate::configuration::Settings;

pub fn run(settings: &Settings) {
    println!("{}", style("Council members").bold());
    for (index, member) in settings.members.iter().enumerate() {
        println!("  {}. {}", index + 1, member);
    }
    println!();
    println!("{} {}", style("Chairman").bold(), settings.chairman);
    println!(
        "{} {}",
        style("Endpoint").dim(),
        settings.provider.to_config().endpoint()
    );
}
