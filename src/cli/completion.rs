//! Shell completion generation for rdf-autocomplete
//!
//! This module generates shell completion scripts for bash, zsh and fish, with
//! dynamic completion of syntax names for `replay --syntax`.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{ConfigError, Result};

const BIN_NAME: &str = "rdf-autocomplete";

/// Generate shell completion script
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish)
pub fn generate_completion(shell_name: &str) -> Result<()> {
    let shell = parse_shell(shell_name)?;
    print!("{}", completion_script(shell));
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

/// Script generated by clap plus the syntax name hook for `shell`
fn completion_script(shell: Shell) -> String {
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);
    let basic_completion = String::from_utf8_lossy(&buffer);

    let extension = match shell {
        Shell::Bash => BASH_SYNTAXES,
        Shell::Zsh => ZSH_SYNTAXES,
        _ => FISH_SYNTAXES,
    };
    format!("{basic_completion}\n{extension}")
}

const BASH_SYNTAXES: &str = r#"
# Complete syntax names from the tool itself
_rdf_autocomplete_enhanced() {
    local cur prev words cword
    _init_completion || return

    if [[ "$prev" == "-s" || "$prev" == "--syntax" ]]; then
        local syntaxes=$(rdf-autocomplete syntaxes --json 2>/dev/null | grep -o '"name":"[^"]*"' | cut -d'"' -f4)
        COMPREPLY=($(compgen -W "$syntaxes" -- "$cur"))
        return 0
    fi

    _rdf-autocomplete "$@"
}

complete -F _rdf_autocomplete_enhanced rdf-autocomplete
"#;

const ZSH_SYNTAXES: &str = r#"
# Complete syntax names from the tool itself
_rdf_autocomplete_syntaxes() {
    local -a syntaxes
    syntaxes=(${(f)"$(rdf-autocomplete syntaxes --json 2>/dev/null | grep -o '"name":"[^"]*"' | cut -d'"' -f4)"})
    _describe 'syntaxes' syntaxes
}

_rdf_autocomplete_enhanced() {
    if [[ ${words[CURRENT-1]} == "-s" || ${words[CURRENT-1]} == "--syntax" ]]; then
        _rdf_autocomplete_syntaxes
        return 0
    fi

    _rdf-autocomplete "$@"
}

compdef _rdf_autocomplete_enhanced rdf-autocomplete
"#;

const FISH_SYNTAXES: &str = r#"
# Complete syntax names from the tool itself
function __rdf_autocomplete_syntaxes
    rdf-autocomplete syntaxes --json 2>/dev/null | string match -ar '"name":"[^"]*"' | string replace -r '"name":"([^"]*)"' '$1'
end

complete -c rdf-autocomplete -n "__fish_seen_subcommand_from replay" -s s -l syntax -f -a "(__rdf_autocomplete_syntaxes)" -d "Syntax name"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell() {
        assert!(matches!(parse_shell("bash"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("zsh"), Ok(Shell::Zsh)));
        assert!(matches!(parse_shell("fish"), Ok(Shell::Fish)));
        assert!(parse_shell("invalid").is_err());
    }

    #[test]
    fn test_parse_shell_case_insensitive() {
        assert!(matches!(parse_shell("BASH"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("Zsh"), Ok(Shell::Zsh)));
        assert!(matches!(parse_shell("FiSh"), Ok(Shell::Fish)));
    }

    #[test]
    fn test_script_includes_syntax_hook() {
        let bash = completion_script(Shell::Bash);
        assert!(bash.contains("replay"));
        assert!(bash.contains("_rdf_autocomplete_enhanced"));

        let fish = completion_script(Shell::Fish);
        assert!(fish.contains("__rdf_autocomplete_syntaxes"));
    }
}
