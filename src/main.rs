use anyhow::{Context, Result};
use clap::Parser;
use msbot::interaction::{Clicker, InputDevice, ScreenCapture};
use msbot::palette::Palette;
use msbot::profile::{Difficulty, Profile};
use msbot::session::Session;
use msbot::sim::{Minefield, Simulator};
use msbot::{exit_codes, logging, Console, RunSummary, Timing};
use std::io::{self, BufRead, Write};
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "msbot",
    version,
    about = "Plays Minesweeper by reading the board off the screen"
)]
struct Cli {
    /// Board profile: 0 Easy, 1 Medium, 2 Hard. Prompted for when absent.
    #[arg(short, long)]
    difficulty: Option<String>,

    /// Milliseconds to wait after each batch of clicks for the board to settle.
    #[arg(long, default_value_t = Timing::default().anim_delay.as_millis() as u64)]
    anim_delay_ms: u64,

    /// Milliseconds a mouse button is held down per click.
    #[arg(long, default_value_t = Timing::default().click_hold.as_millis() as u64)]
    click_hold_ms: u64,

    /// Also right-click the cells the solver flags.
    #[arg(long)]
    click_flags: bool,

    /// Start over with the same profile after each finished run.
    #[arg(long)]
    repeat: bool,

    /// Do not wait for enter before starting or before exiting.
    #[arg(short, long)]
    yes: bool,

    /// Play an in-memory board instead of the screen.
    #[arg(long)]
    simulate: bool,

    /// Seed for the simulated board.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Monitor to capture, zero indexed.
    #[arg(long, default_value_t = 0)]
    monitor: usize,

    /// Keep earlier grids on screen instead of clearing before each one.
    #[arg(long)]
    no_clear: bool,
}

impl Cli {
    fn timing(&self) -> Timing {
        Timing {
            anim_delay: Duration::from_millis(self.anim_delay_ms),
            click_hold: Duration::from_millis(self.click_hold_ms),
        }
    }
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let difficulty = match choose_difficulty(cli.difficulty.as_deref()) {
        Ok(difficulty) => difficulty,
        Err(err) => {
            eprintln!("{:#}", err);
            process::exit(exit_codes::INVALID_SELECTION);
        }
    };

    if let Err(err) = play(&cli, difficulty) {
        eprintln!("{:#}", err);
        process::exit(exit_codes::FAILURE);
    }
    process::exit(exit_codes::OK);
}

fn read_line() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("read stdin")?;
    Ok(line)
}

fn prompt(message: &str) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", message).context("write prompt")?;
    stdout.flush().context("flush stdout")?;
    read_line()
}

fn choose_difficulty(arg: Option<&str>) -> Result<Difficulty> {
    let answer = match arg {
        Some(answer) => answer.to_owned(),
        None => prompt("Enter difficulty [0: Easy, 1: Medium, 2: Hard]: ")?,
    };
    Ok(Difficulty::parse(&answer)?)
}

fn play(cli: &Cli, difficulty: Difficulty) -> Result<()> {
    let profile = difficulty.profile();
    tracing::info!(%difficulty, ?profile, "selected profile");

    if !cli.yes {
        prompt("Press enter to start.\n")?;
    }
    println!("Started.");

    let mut run_index = 0;
    loop {
        let summary = if cli.simulate {
            play_simulated(cli, profile, cli.seed.wrapping_add(run_index))?
        } else {
            play_desktop(cli, profile)?
        };
        println!();
        println!(
            "Stopped after {} passes ({:?}): {} flagged, {} opened, {} mines left.",
            summary.iterations,
            summary.stop,
            summary.flagged,
            summary.opened,
            summary.remaining_mines
        );

        if !cli.yes {
            prompt("Program ended. Press enter to exit.\n")?;
        }
        if !cli.repeat {
            return Ok(());
        }
        run_index += 1;
    }
}

fn play_session<S: ScreenCapture, D: InputDevice>(
    cli: &Cli,
    profile: Profile,
    screen: &mut S,
    device: D,
) -> Result<RunSummary> {
    let timing = cli.timing();
    let mut session = Session::new(profile, Palette::default());
    let mut clicker = Clicker::new(device, profile, &timing, cli.click_flags);
    let mut console = Console {
        out: io::stdout(),
        clear: !cli.no_clear,
    };
    let summary = msbot::run(&mut session, screen, &mut clicker, &timing, &mut console)?;
    Ok(summary)
}

fn play_simulated(cli: &Cli, profile: Profile, seed: u64) -> Result<RunSummary> {
    let sim = Simulator::new(Minefield::new(profile, Palette::default(), seed));
    let summary = play_session(cli, profile, &mut sim.screen(), sim.mouse())?;
    let (won, exploded) = sim.with_field(|f| (f.is_won(), f.exploded()));
    println!("Simulated board (seed {}): won = {}, exploded = {}", seed, won, exploded);
    Ok(summary)
}

#[cfg(feature = "desktop")]
fn play_desktop(cli: &Cli, profile: Profile) -> Result<RunSummary> {
    use msbot::desktop::{DesktopMouse, DesktopScreen};

    let mut screen = DesktopScreen::new(cli.monitor).context("open screen capture")?;
    play_session(cli, profile, &mut screen, DesktopMouse::new())
}

#[cfg(not(feature = "desktop"))]
fn play_desktop(cli: &Cli, _profile: Profile) -> Result<RunSummary> {
    anyhow::bail!(
        "built without screen access (monitor {}); \
         rebuild with `--features desktop` or pass --simulate",
        cli.monitor
    )
}
