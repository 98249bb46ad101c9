//! Shell completion generation

use clap::CommandFactory;
use clap_complete::{Generator, Shell};

use super::Cli;
use crate::exit_code::ExitCode;

/// Arguments for the completions command
#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Generate shell completions and print to stdout
pub fn execute(args: CompletionsArgs) -> ExitCode {
    write_completions(args.shell, &mut std::io::stdout());
    ExitCode::Success
}

fn write_completions<G: Generator>(generator: G, out: &mut dyn std::io::Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(generator, &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completions(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_completions_bash() {
        let output = completions(Shell::Bash);
        assert!(output.contains("s3nav"));
        assert!(output.contains("complete"));
        assert!(output.contains("profile"));
    }

    #[test]
    fn test_completions_zsh() {
        let output = completions(Shell::Zsh);
        assert!(output.contains("compdef"));
    }

    #[test]
    fn test_completions_fish() {
        let output = completions(Shell::Fish);
        assert!(output.contains("complete -c s3nav"));
    }
}
