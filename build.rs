use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use clap::ValueEnum;
use clap_complete::Shell;
use anyhow::{Context, Result};

pub mod cli {
    #![allow(dead_code)]
    include!("src/cli/mod.rs");
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/cli");

    let mut hkp = cli::build();

    // Dump help output of all commands and subcommands, for inclusion in docs
    dump_help(hkp.clone()).unwrap();

    generate_shell_completions(&mut hkp).unwrap();
}

/// Generates shell completions.
fn generate_shell_completions(hkp: &mut clap::Command) -> Result<()> {
    let outdir: PathBuf =
        env::var_os("OUT_DIR").expect("OUT_DIR not set").into();
    assert!(outdir.is_dir());
    let path = outdir.join("shell-completions");
    fs::create_dir_all(&path)?;

    for shell in Shell::value_variants() {
        clap_complete::generate_to(*shell, hkp, "hkp", &path)?;
    };

    println!("cargo:warning=shell completions written to {}", path.display());
    Ok(())
}

fn dump_help(mut cmd: clap::Command) -> Result<()> {
    cmd = cmd.term_width(80);
    cmd.build();
    let path = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR not set"))
        .join("hkp-usage.md");
    let mut sink = fs::File::create(&path)
        .with_context(|| format!("trying to create {}", path.display()))?;

    dump_help_inner(&mut sink, &mut cmd, "##")
}

fn dump_help_inner(
    sink: &mut dyn Write,
    cmd: &mut clap::Command,
    heading: &str,
) -> Result<()> {
    writeln!(sink)?;

    let mut buffer = Vec::new();
    let _ = cmd.write_long_help(&mut buffer);
    let help = std::str::from_utf8(buffer.as_slice())?;

    let mut verbatim = false;
    for line in help.trim_end().split('\n').skip(1) {
        if ! verbatim && line.starts_with("Usage:") {
            writeln!(sink, "```text")?;
            verbatim = true;
        }

        if line.is_empty() {
            writeln!(sink)?;
        } else {
            writeln!(sink, "{}", line.trim_end())?;
        }
    }
    if verbatim {
        writeln!(sink, "```")?;
    }

    // Recurse.
    for subcommand in cmd
        .get_subcommands_mut()
        .filter(|sc| sc.get_name() != "help")
    {
        writeln!(sink)?;
        let heading_name = subcommand
            .get_display_name()
            .unwrap_or_else(|| subcommand.get_name())
            .replace('-', " ");
        writeln!(sink, "{} Subcommand {}", heading, heading_name)?;

        dump_help_inner(sink, subcommand, &format!("{}#", heading))?;
    }

    Ok(())
}
