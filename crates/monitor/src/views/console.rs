use colored::Colorize;

pub struct Console;

impl Console {
    const fn width() -> usize {
        48
    }

    pub fn section(title: &str) {
        let width = Self::width();
        let border = "═".repeat(width);
        println!();
        println!("{}", format!("╔{border}╗").magenta().bold());
        println!("{}", format!("{title:^width$}").magenta().bold());
        println!("{}", format!("╚{border}╝").magenta().bold());
    }

    pub fn info(label: &str, value: &str) {
        println!("{}: {}", label.dimmed().magenta(), value.white());
    }

    pub fn success(text: &str) {
        println!("{} {}", "✓".green().bold(), text.green());
    }

    pub fn warning(text: &str) {
        println!("{} {}", "⚠".yellow().bold(), text.yellow());
    }

    pub fn user_error(text: &str) {
        println!("{} {}", "✗".red().bold(), text.red());
    }

    pub fn progress(text: &str) {
        println!("{} {}", "→".cyan().bold(), text.cyan());
    }
}
