use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use typed_builder::TypedBuilder;

pub const USAGE: &str = "\
usage: gbz80-run <rom> [options]

options:
  --start <addr>        program counter to start from (default 0x0150)
  --steps <n>           maximum number of instructions to execute (default 64)
  --dump <addr>:<len>   hexdump a memory range after the run
  --keep-going          keep stepping while the cpu is halted or stopped
  -h, --help            print this message

numbers are decimal or 0x-prefixed hex";

/// Memory range printed after the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DumpRange {
    pub start: u16,
    pub len: usize,
}

#[derive(Debug, TypedBuilder)]
pub struct RunConfig {
    #[builder(setter(into))]
    pub rom_path: PathBuf,
    /// Entry point; the image itself is always loaded at 0x0000.
    #[builder(default = 0x0150)]
    pub start_pc: u16,
    #[builder(default = 64)]
    pub max_steps: usize,
    #[builder(default, setter(strip_option))]
    pub dump: Option<DumpRange>,
    /// Stop once the core goes idle instead of burning the step budget.
    #[builder(default = true)]
    pub stop_on_idle: bool,
}

/// Parse the arguments following the program name.
///
/// Returns `Ok(None)` when help was requested.
pub fn parse_args<I>(args: I) -> Result<Option<RunConfig>>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut rom_path = None;
    let mut start_pc = None;
    let mut max_steps = None;
    let mut dump = None;
    let mut stop_on_idle = true;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--start" => {
                let value = flag_value(&mut args, "--start")?;
                let addr = u16::try_from(parse_number(&value)?)
                    .with_context(|| format!("start address {value} is outside 0x0000-0xFFFF"))?;
                start_pc = Some(addr);
            }
            "--steps" => {
                let value = flag_value(&mut args, "--steps")?;
                max_steps = Some(
                    usize::try_from(parse_number(&value)?)
                        .with_context(|| format!("step count {value} is too large"))?,
                );
            }
            "--dump" => {
                let value = flag_value(&mut args, "--dump")?;
                dump = Some(parse_dump(&value)?);
            }
            "--keep-going" => stop_on_idle = false,
            flag if flag.starts_with('-') => bail!("unknown option '{flag}'\n\n{USAGE}"),
            path => {
                if rom_path.replace(PathBuf::from(path)).is_some() {
                    bail!("more than one ROM path given\n\n{USAGE}");
                }
            }
        }
    }

    let rom_path = rom_path.ok_or_else(|| anyhow!("no ROM path provided\n\n{USAGE}"))?;
    let mut config = RunConfig::builder()
        .rom_path(rom_path)
        .stop_on_idle(stop_on_idle)
        .build();
    if let Some(start_pc) = start_pc {
        config.start_pc = start_pc;
    }
    if let Some(max_steps) = max_steps {
        config.max_steps = max_steps;
    }
    config.dump = dump;
    Ok(Some(config))
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("option {flag} expects a value"))
}

/// Decimal or `0x`-prefixed hexadecimal.
fn parse_number(text: &str) -> Result<u64> {
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.with_context(|| format!("'{text}' is not a number"))
}

fn parse_dump(text: &str) -> Result<DumpRange> {
    let (start, len) = text
        .split_once(':')
        .with_context(|| format!("dump range '{text}' must look like <addr>:<len>"))?;
    let start = u16::try_from(parse_number(start)?)
        .with_context(|| format!("dump address {start} is outside 0x0000-0xFFFF"))?;
    let len = usize::try_from(parse_number(len)?)
        .with_context(|| format!("dump length {len} is too large"))?;
    Ok(DumpRange { start, len })
}
