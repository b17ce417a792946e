use std::path::PathBuf;

#[derive(Debug, Default)]
struct CliArgs {
    dir: Option<PathBuf>,
    mute: bool,
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1).collect())?;
    tapdeck::app::run_with_startup(tapdeck::app::AppStartupOptions {
        music_dir: args.dir,
        force_mute: args.mute,
    })
}

fn parse_args(args: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--dir" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--dir requires a path value");
                };
                if value.trim().is_empty() {
                    anyhow::bail!("--dir cannot be empty");
                }
                out.dir = Some(PathBuf::from(value.trim()));
            }
            "--mute" => out.mute = true,
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
        index += 1;
    }
    Ok(out)
}

fn print_help() {
    println!("TapDeck");
    println!("  --dir <path>    Music directory to play from");
    println!("  --mute          Run with the silent audio engine");
}
