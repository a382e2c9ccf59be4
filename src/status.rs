use colorful::Color;
use colorful::Colorful;

pub fn done(log: &str) {
    println!("{} {}", "[+]".color(Color::Green), log.color(Color::Green))
}

pub fn fail(log: &str) {
    println!("{} {}", "[!]".color(Color::Red), log.color(Color::Red))
}

pub fn pending(log: &str) {
    println!(
        "{} {}",
        "[-]".color(Color::Yellow),
        log.color(Color::Yellow)
    )
}
