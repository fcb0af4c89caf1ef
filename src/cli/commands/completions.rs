//! Shell completions generation.

use clap::CommandFactory;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::Result;

use super::CommandResult;

pub fn execute(args: &CompletionsArgs) -> Result<CommandResult> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "oaslint", &mut std::io::stdout());
    Ok(CommandResult::success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap_complete::Shell;

    #[test]
    fn generates_bash_completions() {
        let mut cmd = Cli::command();
        let mut buf = Vec::new();
        clap_complete::generate(Shell::Bash, &mut cmd, "oaslint", &mut buf);
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("oaslint"));
        assert!(output.contains("complete"));
    }

    #[test]
    fn generates_zsh_completions() {
        let mut cmd = Cli::command();
        let mut buf = Vec::new();
        clap_complete::generate(Shell::Zsh, &mut cmd, "oaslint", &mut buf);
        assert!(String::from_utf8(buf).unwrap().contains("oaslint"));
    }
}
