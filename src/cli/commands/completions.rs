use crate::cli::{Cli, Shell};
use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};
use std::io::{self, Write};

const BIN_NAME: &str = "ocli";

impl From<Shell> for ClapShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => ClapShell::Bash,
            Shell::Zsh => ClapShell::Zsh,
            Shell::Fish => ClapShell::Fish,
            Shell::PowerShell => ClapShell::PowerShell,
            Shell::Elvish => ClapShell::Elvish,
        }
    }
}

pub fn execute(shell: Shell) {
    write_completions(shell.clone(), &mut io::stdout());
    eprintln!("# {}", install_hint(&shell));
}

fn write_completions<W: Write>(shell: Shell, out: &mut W) {
    let mut cmd = Cli::command();
    generate(ClapShell::from(shell), &mut cmd, BIN_NAME, out);
}

fn install_hint(shell: &Shell) -> &'static str {
    match shell {
        Shell::Bash => "Add to ~/.bashrc: eval \"$(ocli completions bash)\"",
        Shell::Zsh => "Add to ~/.zshrc: eval \"$(ocli completions zsh)\"",
        Shell::Fish => "Save with: ocli completions fish > ~/.config/fish/completions/ocli.fish",
        Shell::PowerShell => "Add to profile: ocli completions powershell | Out-String | Invoke-Expression",
        Shell::Elvish => "Add to rc.elv: eval (ocli completions elvish | slurp)",
    }
}
