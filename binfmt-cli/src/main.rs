use anyhow::{Context, Result};
use binfmt_core::{Arch, Registrar, RegistrationRecord};
use clap::Parser;
use colored::Colorize;
use tabled::{Table, Tabled};

/// Register a QEMU user-mode emulator with binfmt_misc
#[derive(Parser)]
#[command(
    name = "binfmt-register",
    about = "Register a foreign-architecture emulator in binfmt_misc for use inside a chroot",
    version
)]
struct Cli {
    /// Target architecture (e.g. armv7l, aarch64)
    #[arg(short, long, default_value = "armv7l")]
    arch: String,

    /// Absolute path to the emulator as seen from inside the chroot
    #[arg(short, long, default_value = "/usr/bin/qemu-arm")]
    qemu: String,
}

#[derive(Tabled)]
struct Field {
    #[tabled(rename = "Field")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn summary(record: &RegistrationRecord) -> Table {
    let rows = vec![
        Field {
            key: "name",
            value: record.name().to_string(),
        },
        Field {
            key: "magic",
            value: record.magic().to_string(),
        },
        Field {
            key: "mask",
            value: record.mask().to_string(),
        },
        Field {
            key: "interpreter",
            value: record.interpreter().to_string(),
        },
        Field {
            key: "kind",
            value: record.kind().to_string(),
        },
        Field {
            key: "flags",
            value: record.flags().to_string(),
        },
    ];
    Table::new(rows)
}

fn run(cli: &Cli) -> Result<RegistrationRecord> {
    // Resolve before touching the kernel so a bad name leaves existing handlers alone.
    let arch: Arch = cli.arch.parse()?;
    log::info!("Resolved {:?} to {}", cli.arch, arch);

    let registrar = Registrar::from_env();
    log::debug!("Using binfmt_misc at {}", registrar.root().display());
    registrar
        .check()
        .context("binfmt_misc is not available; mount it or load the binfmt_misc module")?;

    registrar
        .disable_all()
        .context("Failed to clear existing registrations")?;
    let record = registrar
        .register(arch, &cli.qemu)
        .with_context(|| format!("Failed to register {} for {}", cli.qemu, arch))?;

    Ok(record)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let record = run(&cli).inspect_err(|err| log::error!("{err:#}"))?;
    println!(
        "{} {} -> {}",
        "registered".green().bold(),
        record.arch(),
        record.interpreter()
    );
    println!("{}", summary(&record));

    Ok(())
}
