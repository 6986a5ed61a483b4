//! DRV8833 ramp on the host
//!
//! Runs a speed ramp against simulated PWM and ramp timers. A background
//! thread stands in for the ramp clock interrupt: while the simulated timer
//! is armed it sleeps for the programmed update period and then calls the
//! interrupt entry point, exactly as the timer vector would on target.
//!
//! ```text
//! RUST_LOG=debug cargo run -p ramp-sim -- --target 80 --duration-ms 400
//! ```

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use drv8833::{Direction, DriverConfig, RampStatus, SharedDriver, TickOutcome};
use motor_hal::sim::{SimPwm, SimRampTimer};
use motor_hal::{ApbPrescaler, BusClock, ChannelId, ClockSource, TimerTiming};

const IN1: ChannelId = ChannelId(1);
const IN2: ChannelId = ChannelId(2);

static MOTOR: SharedDriver<SimPwm, SimRampTimer, BusClock> = SharedDriver::new();

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Dir {
    Forward,
    Reverse,
}

impl From<Dir> for Direction {
    fn from(value: Dir) -> Self {
        match value {
            Dir::Forward => Direction::Forward,
            Dir::Reverse => Direction::Reverse,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ramp-sim")]
#[command(about = "Simulate a DRV8833 speed ramp on host timers", long_about = None)]
struct Args {
    /// Ramp direction
    #[arg(long, value_enum, default_value = "forward")]
    direction: Dir,

    /// Speed to hold before the ramp starts (percent)
    #[arg(long, default_value = "0")]
    start: u8,

    /// Ramp target speed (percent, clamped to 100)
    #[arg(long, default_value = "100")]
    target: u8,

    /// Requested ramp duration in milliseconds
    #[arg(long, default_value = "500")]
    duration_ms: u32,

    /// Ramp timer bus clock in hertz
    #[arg(long, default_value = "42000000")]
    pclk_hz: u32,

    /// Ramp timer bus prescaler (1, 2, 4, 8 or 16)
    #[arg(long, default_value = "2")]
    apb_divider: u32,

    /// PWM timer auto-reload value
    #[arg(long, default_value = "999")]
    pwm_reload: u32,

    /// Brake instead of holding speed once the ramp finishes
    #[arg(long)]
    brake: bool,
}

fn apb_prescaler(divider: u32) -> Result<ApbPrescaler> {
    Ok(match divider {
        1 => ApbPrescaler::Div1,
        2 => ApbPrescaler::Div2,
        4 => ApbPrescaler::Div4,
        8 => ApbPrescaler::Div8,
        16 => ApbPrescaler::Div16,
        other => bail!("unsupported APB divider {}", other),
    })
}

/// Ramp clock "interrupt": fire at the period the driver programmed.
fn spawn_ramp_clock(timer: SimRampTimer, timer_clock_hz: u32) -> thread::JoinHandle<usize> {
    thread::spawn(move || {
        let mut ticks = 0;
        while timer.is_running() {
            let timing = TimerTiming {
                reload: timer.reload_value(),
                prescaler: timer.prescaler_value(),
                period_us: 0,
            };
            thread::sleep(Duration::from_micros(timing.actual_period_us(timer_clock_hz)));

            match MOTOR.on_ramp_interrupt() {
                Ok(TickOutcome::Ignored) => {}
                Ok(_) => ticks += 1,
                Err(err) => {
                    log::error!("ramp tick failed: {}", err);
                    break;
                }
            }
        }
        ticks
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let clock = BusClock::new(args.pclk_hz, apb_prescaler(args.apb_divider)?);
    let pwm = SimPwm::new(args.pwm_reload);
    let timer = SimRampTimer::new();

    MOTOR
        .init(DriverConfig::new(pwm.clone(), IN1, IN2, timer.clone(), clock))
        .context("failed to initialize driver")?;

    let with_motor = |what: &str| anyhow!("driver missing while {}", what);

    if args.start > 0 {
        MOTOR
            .with(|d| d.start(args.direction.into(), args.start))
            .ok_or_else(|| with_motor("starting"))??;
    }

    let status = MOTOR
        .with(|d| d.start_ramped(args.direction.into(), args.target, args.duration_ms))
        .ok_or_else(|| with_motor("arming ramp"))??;

    let (plan, timing) = match status {
        RampStatus::Armed { plan, timing } => (plan, timing),
        other => {
            info!("nothing to ramp: {:?}", other);
            return Ok(());
        }
    };
    info!(
        "ramp {} ({}ms nominal), timer clock {}Hz, {}",
        plan,
        plan.nominal_duration_ms(),
        clock.timer_clock_hz(),
        timing
    );

    let started = Instant::now();
    let ramp_clock = spawn_ramp_clock(timer.clone(), clock.timer_clock_hz());
    let ticks = ramp_clock
        .join()
        .map_err(|_| anyhow!("ramp clock thread panicked"))?;
    let elapsed = started.elapsed();

    let state = MOTOR
        .with(|d| d.state())
        .ok_or_else(|| with_motor("reading state"))?;
    info!(
        "{} ticks in {:?} (requested {}ms): speed {}, {:?}, IN1={} IN2={}",
        ticks,
        elapsed,
        args.duration_ms,
        state.speed,
        state.phase(),
        pwm.compare_value(IN1),
        pwm.compare_value(IN2)
    );

    if args.brake {
        MOTOR
            .with(|d| d.brake())
            .ok_or_else(|| with_motor("braking"))??;
        info!(
            "braked: IN1={} IN2={}",
            pwm.compare_value(IN1),
            pwm.compare_value(IN2)
        );
    }

    MOTOR.destroy();
    Ok(())
}
