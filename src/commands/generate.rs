//! `generate` subcommand: shell completions and man pages.
use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write completions for `shell` to `out`.
pub fn write_completions<W: Write>(
    shell: Shell,
    cmd: &mut Command,
    out: &mut W,
) {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, out);
}

/// Render man pages for `cmd` and each of its subcommands, recursively, into
/// `output_dir` (the current directory if `None`). Subcommand pages are named
/// `<parent>-<subcommand>.1`.
///
/// Returns the paths written, parent pages first.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or a page
/// cannot be written.
pub fn generate_man_pages(
    cmd: &Command,
    output_dir: Option<PathBuf>,
) -> Result<Vec<PathBuf>> {
    let output_dir = match output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Opening current directory")?,
    };
    std::fs::create_dir_all(&output_dir)
        .context("create output Man directories")?;

    let mut written = Vec::new();
    render_page(cmd.clone(), &output_dir, &mut written)?;
    render_subcommands(cmd, &output_dir, cmd.get_name(), &mut written)?;
    Ok(written)
}

fn render_subcommands(
    cmd: &Command,
    output_dir: &Path,
    prefix: &str,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    for subcmd in cmd.get_subcommands() {
        let prefixed_name = format!("{prefix}-{}", subcmd.get_name());
        // clap_mangen takes the page name from the command itself, which
        // only accepts a &'static str
        let leaked_name: &'static str =
            Box::leak(prefixed_name.clone().into_boxed_str());
        let renamed = subcmd
            .clone()
            .name(leaked_name)
            .disable_help_subcommand(true);
        render_page(renamed, output_dir, written)?;

        if subcmd.has_subcommands() {
            render_subcommands(subcmd, output_dir, &prefixed_name, written)?;
        }
    }
    Ok(())
}

fn render_page(
    cmd: Command,
    output_dir: &Path,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let path = output_dir.join(format!("{}.1", cmd.get_name()));
    let mut file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    clap_mangen::Man::new(cmd)
        .render(&mut file)
        .with_context(|| format!("failed to render {}", path.display()))?;
    written.push(path);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn command() -> Command {
        Command::new("jsm")
            .subcommand(Command::new("tokens"))
            .subcommand(
                Command::new("generate")
                    .subcommand(Command::new("shell"))
                    .subcommand(Command::new("man")),
            )
    }

    #[test]
    fn man_pages_for_every_subcommand() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = Some(dir.path().to_path_buf());
        let written = generate_man_pages(&command(), output_dir).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            [
                "jsm.1",
                "jsm-tokens.1",
                "jsm-generate.1",
                "jsm-generate-shell.1",
                "jsm-generate-man.1"
            ]
        );
        assert!(written.iter().all(|p| p.metadata().unwrap().len() > 0));
    }

    #[test]
    fn bash_completions_name_the_binary() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut command(), &mut out);
        assert!(String::from_utf8(out).unwrap().contains("jsm"));
    }
}
