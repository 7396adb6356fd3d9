#![allow(nonstandard_style)]

mod calculating;
mod error_handling;
mod evaluating;
mod parsing;
mod scanning;

use calculating::*;

fn main() {
    use std::io::Write;

    env_logger::init();

    print!("> ");
    std::io::stdout().flush().unwrap();

    let mut calculator = Calculator::new(std::io::stdout());

    for line in std::io::stdin().lines() {
        let line = line.unwrap();

        if line.is_empty() {
            break;
        }

        for character in line.chars() {
            if let Err(e) = calculator.receive(character) {
                println!("{}", red(format!("Error, {}", e)));
            }
        }
        if !line.trim_end().ends_with('=') {
            println!();
        }

        print!("> ");
        std::io::stdout().flush().unwrap();
    }

    println!("{}", green(String::from("Completed")));
}

#[inline]
fn red(string: String) -> String {
    format!("{}{}{}", "\u{001b}[31m\u{001b}[1m", string, "\u{001b}[0m")
}

#[inline]
fn green(string: String) -> String {
    format!("{}{}{}", "\u{001b}[32m\u{001b}[1m", string, "\u{001b}[0m")
}
