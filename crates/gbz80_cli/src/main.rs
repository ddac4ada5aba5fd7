mod config;

use std::fmt::Write as _;

use anyhow::{Context, Result};
use gbz80::{Dmg, StepOutcome};

use config::{RunConfig, USAGE};

fn main() -> Result<()> {
    env_logger::init();

    let Some(config) = config::parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };
    run(&config)
}

fn run(config: &RunConfig) -> Result<()> {
    let rom = std::fs::read(&config.rom_path)
        .with_context(|| format!("failed to read ROM file '{}'", config.rom_path.display()))?;
    log::info!("Loaded ROM '{}' ({} bytes)", config.rom_path.display(), rom.len());

    let mut dmg = Dmg::new();
    dmg.load_program(&rom)
        .with_context(|| format!("cannot load '{}'", config.rom_path.display()))?;
    dmg.cpu.regs.set_pc(config.start_pc);

    let mut executed = 0usize;
    let mut failure = None;
    for _ in 0..config.max_steps {
        match dmg.step() {
            Ok(StepOutcome::Executed(_)) => executed += 1,
            Ok(StepOutcome::Idle) if config.stop_on_idle => {
                log::info!("CPU went idle ({:?})", dmg.cpu.mode());
                break;
            }
            Ok(StepOutcome::Idle) => {}
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }
    log::info!("Executed {executed} instructions");

    println!("{}", dmg.registers());
    if let Some(dump) = config.dump {
        print!("{}", hexdump(dump.start, dmg.memory().range(dump.start, dump.len)));
    }

    match failure {
        Some(err) => Err(err).context("emulation stopped"),
        None => Ok(()),
    }
}

/// 16 bytes per row, each row prefixed with its address.
fn hexdump(start: u16, bytes: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let addr = start as usize + row * 16;
        let _ = write!(out, "{addr:04X}:");
        for byte in chunk {
            let _ = write!(out, " {byte:02X}");
        }
        out.push('\n');
    }
    out
}
