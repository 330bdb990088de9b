//! Shell completion generation for searchline
//!
//! Generates completion scripts for bash, zsh and fish. The `complete` and
//! `validate` subcommands also get their QUERY argument completed, by asking
//! `searchline complete` for suggestions on the word being typed.

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

use crate::cli::CliArgs;
use crate::error::{ConfigError, Result};

const BIN_NAME: &str = "searchline";

/// Generate shell completion script on stdout
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish)
pub fn generate_completion(shell_name: &str) -> Result<()> {
    let shell = parse_shell(shell_name)?;
    let mut stdout = io::stdout().lock();
    write_completion(shell, &mut stdout)
}

/// Write the completion script for `shell`
pub fn write_completion(shell: Shell, out: &mut impl Write) -> Result<()> {
    let mut cmd = CliArgs::command();
    generate(shell, &mut cmd, BIN_NAME, &mut *out);

    let extra = match shell {
        Shell::Bash => BASH_QUERY_COMPLETION,
        Shell::Zsh => ZSH_QUERY_COMPLETION,
        Shell::Fish => FISH_QUERY_COMPLETION,
        _ => "",
    };
    out.write_all(extra.as_bytes())?;
    Ok(())
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(ConfigError::Generic(format!(
            "Unsupported shell: {}. Supported shells: bash, zsh, fish",
            shell_name
        ))
        .into()),
    }
}

const BASH_QUERY_COMPLETION: &str = r#"
# Complete QUERY arguments through searchline itself
_searchline_query() {
    local cur="${COMP_WORDS[COMP_CWORD]}"
    local IFS=$'\n'
    COMPREPLY=($(searchline --format plain -q complete "$cur" 2>/dev/null | sed -e 's/^" *//' -e 's/"$//'))
}

_searchline_enhanced() {
    local sub="${COMP_WORDS[1]}"
    if [[ ( "$sub" == "complete" || "$sub" == "validate" ) && $COMP_CWORD -ge 2 && "${COMP_WORDS[COMP_CWORD]}" != -* ]]; then
        _searchline_query
        return 0
    fi
    _searchline "$@"
}

complete -F _searchline_enhanced -o bashdefault -o default searchline
"#;

const ZSH_QUERY_COMPLETION: &str = r#"
# Complete QUERY arguments through searchline itself
_searchline_query() {
    local -a suggestions
    suggestions=("${(@f)$(searchline --format plain -q complete "$PREFIX" 2>/dev/null | sed -e 's/^" *//' -e 's/"$//')}")
    compadd -Q -U -- "${suggestions[@]}"
}

_searchline_enhanced() {
    if [[ ( ${words[2]} == complete || ${words[2]} == validate ) && CURRENT -ge 3 && ${words[CURRENT]} != -* ]]; then
        _searchline_query
        return 0
    fi
    _searchline "$@"
}

compdef _searchline_enhanced searchline
"#;

const FISH_QUERY_COMPLETION: &str = r#"
# Complete QUERY arguments through searchline itself
function __searchline_query
    searchline --format plain -q complete (commandline -ct) 2>/dev/null | string trim -c '" '
end

complete -c searchline -n "__fish_seen_subcommand_from complete validate" -f -a "(__searchline_query)"
"#;
