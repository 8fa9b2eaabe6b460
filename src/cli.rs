//! # Command Line Interface for the Self-Test Binary

use std::fmt;
use std::io::Error as IOError;
use std::io::Write;
use std::time::Duration;

use clap::{crate_name, crate_version, Parser};
use cpu_time::ProcessTime;
use termcolor::{Buffer, BufferWriter, Color, ColorSpec, WriteColor};

use crate::{types::ParetoFront, LoggerError, Phase, WriteEnumLog};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct CliArgs {
    /// The base seed for the randomized rounds. Every round derives its own
    /// seed from this value; a failure prints the offending seed so it can
    /// be replayed. Nondeterministic if omitted.
    seed: Option<u64>,
    /// The number of randomized rounds to run
    #[arg(long, default_value_t = 1000)]
    rounds: usize,
    #[command(flatten)]
    color: concolor_clap::Color,
    /// Don't print statistics
    #[arg(long)]
    no_print_stats: bool,
    /// Log cover candidates of the demonstration instance
    #[arg(long)]
    log_candidates: bool,
    /// Log oracle calls of the demonstration instance
    #[arg(long)]
    log_oracle_calls: bool,
    /// Log Pareto points of the demonstration instance
    #[arg(long)]
    log_pareto_points: bool,
}

/// Aggregate statistics over all rounds of a harness run
#[derive(Debug, Clone, Copy, Default)]
pub struct HarnessSummary {
    /// The number of rounds run
    pub n_rounds: usize,
    /// The number of Pareto points discovered across all rounds
    pub n_pareto_points: usize,
    /// The number of oracle calls issued across all rounds
    pub n_oracle_calls: usize,
    /// The number of answers deduced from negative buffers across all rounds
    pub n_deduced: usize,
}

pub struct Cli {
    pub seed: Option<u64>,
    pub rounds: usize,
    stdout: BufferWriter,
    stderr: BufferWriter,
    print_stats: bool,
    color: concolor_clap::ColorChoice,
    logger_config: LoggerConfig,
}

fn color_choice(color: concolor_clap::ColorChoice, stream: atty::Stream) -> termcolor::ColorChoice {
    match color {
        concolor_clap::ColorChoice::Always => termcolor::ColorChoice::Always,
        concolor_clap::ColorChoice::Never => termcolor::ColorChoice::Never,
        concolor_clap::ColorChoice::Auto => {
            if atty::is(stream) {
                termcolor::ColorChoice::Auto
            } else {
                termcolor::ColorChoice::Never
            }
        }
    }
}

impl Cli {
    pub fn init() -> Self {
        let args = CliArgs::parse();
        Self {
            seed: args.seed,
            rounds: args.rounds,
            stdout: BufferWriter::stdout(color_choice(args.color.color, atty::Stream::Stdout)),
            stderr: BufferWriter::stderr(color_choice(args.color.color, atty::Stream::Stderr)),
            print_stats: !args.no_print_stats,
            color: args.color.color,
            logger_config: LoggerConfig {
                log_candidates: args.log_candidates,
                log_oracle_calls: args.log_oracle_calls,
                log_pareto_points: args.log_pareto_points,
            },
        }
    }

    pub fn new_cli_logger(&self) -> CliLogger {
        CliLogger {
            stdout: BufferWriter::stdout(color_choice(self.color, atty::Stream::Stdout)),
            config: self.logger_config.clone(),
        }
    }

    pub fn warning(&self, msg: &str) -> Result<(), IOError> {
        let mut buffer = self.stderr.buffer();
        buffer.set_color(ColorSpec::new().set_bold(true).set_fg(Some(Color::Yellow)))?;
        write!(&mut buffer, "warning")?;
        buffer.reset()?;
        buffer.set_color(ColorSpec::new().set_bold(true))?;
        write!(&mut buffer, ": ")?;
        buffer.reset()?;
        writeln!(&mut buffer, "{}", msg)?;
        self.stderr.print(&buffer)?;
        Ok(())
    }

    pub fn error(&self, msg: &str) -> Result<(), IOError> {
        let mut buffer = self.stderr.buffer();
        buffer.set_color(ColorSpec::new().set_bold(true).set_fg(Some(Color::Red)))?;
        write!(&mut buffer, "error")?;
        buffer.reset()?;
        buffer.set_color(ColorSpec::new().set_bold(true))?;
        write!(&mut buffer, ": ")?;
        buffer.reset()?;
        writeln!(&mut buffer, "{}", msg)?;
        self.stderr.print(&buffer)?;
        Ok(())
    }

    pub fn info(&self, msg: &str) -> Result<(), IOError> {
        let mut buffer = self.stdout.buffer();
        buffer.set_color(ColorSpec::new().set_bold(true).set_fg(Some(Color::Blue)))?;
        write!(&mut buffer, "info")?;
        buffer.reset()?;
        buffer.set_color(ColorSpec::new().set_bold(true))?;
        write!(&mut buffer, ": ")?;
        buffer.reset()?;
        writeln!(&mut buffer, "{}", msg)?;
        self.stdout.print(&buffer)?;
        Ok(())
    }

    pub fn print_header(&self) -> Result<(), IOError> {
        let mut buffer = self.stdout.buffer();
        buffer.set_color(ColorSpec::new().set_bold(true).set_fg(Some(Color::Green)))?;
        write!(&mut buffer, "{}", crate_name!())?;
        buffer.reset()?;
        buffer.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(&mut buffer, " ({})", crate_version!())?;
        buffer.reset()?;
        buffer.set_color(ColorSpec::new().set_bold(true))?;
        write!(buffer, "==============================")?;
        buffer.reset()?;
        writeln!(buffer)?;
        self.stdout.print(&buffer)?;
        Ok(())
    }

    pub fn print_pareto_front(&self, pareto_front: ParetoFront) -> Result<(), IOError> {
        let mut buffer = self.stdout.buffer();
        Self::start_block(&mut buffer)?;
        buffer.set_color(ColorSpec::new().set_bold(true).set_fg(Some(Color::Blue)))?;
        write!(&mut buffer, "Discovered Pareto Front")?;
        buffer.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(&mut buffer, ": ")?;
        buffer.reset()?;
        for point in &pareto_front {
            buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(&mut buffer, "Pareto Point")?;
            buffer.reset()?;
            writeln!(&mut buffer, ": {}", PointPrinter::new(point))?;
        }
        Self::end_block(&mut buffer)?;
        self.stdout.print(&buffer)?;
        Ok(())
    }

    pub fn print_stats(&self, summary: HarnessSummary, cpu_time: Duration) -> Result<(), IOError> {
        if self.print_stats {
            let mut buffer = self.stdout.buffer();
            Self::start_block(&mut buffer)?;
            buffer.set_color(ColorSpec::new().set_bold(true).set_fg(Some(Color::Blue)))?;
            write!(&mut buffer, "Harness Stats")?;
            buffer.reset()?;
            buffer.set_color(ColorSpec::new().set_bold(true))?;
            writeln!(&mut buffer, ": ")?;
            buffer.reset()?;
            Self::print_parameter(&mut buffer, "n-rounds", summary.n_rounds)?;
            Self::print_parameter(&mut buffer, "n-pareto-points", summary.n_pareto_points)?;
            Self::print_parameter(&mut buffer, "n-oracle-calls", summary.n_oracle_calls)?;
            Self::print_parameter(&mut buffer, "n-deduced", summary.n_deduced)?;
            Self::print_parameter(&mut buffer, "cpu-time", cpu_time.as_secs_f32())?;
            Self::end_block(&mut buffer)?;
            self.stdout.print(&buffer)?;
        }
        Ok(())
    }

    fn print_parameter<V: fmt::Display>(
        buffer: &mut Buffer,
        name: &str,
        val: V,
    ) -> Result<(), IOError> {
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(buffer, "{}", name)?;
        buffer.reset()?;
        writeln!(buffer, ": {}", val)?;
        Ok(())
    }

    fn start_block(buffer: &mut Buffer) -> Result<(), IOError> {
        buffer.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(buffer, ">>>>>")?;
        buffer.reset()?;
        writeln!(buffer)?;
        Ok(())
    }

    fn end_block(buffer: &mut Buffer) -> Result<(), IOError> {
        buffer.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(buffer, "<<<<<")?;
        buffer.reset()?;
        writeln!(buffer)?;
        Ok(())
    }
}

#[derive(Clone)]
struct LoggerConfig {
    log_candidates: bool,
    log_oracle_calls: bool,
    log_pareto_points: bool,
}

pub struct CliLogger {
    stdout: BufferWriter,
    config: LoggerConfig,
}

impl CliLogger {
    fn wrap_error<T>(ires: Result<T, IOError>) -> Result<T, LoggerError> {
        match ires {
            Ok(t) => Ok(t),
            Err(ierror) => Err(LoggerError::new(ierror)),
        }
    }

    fn ilog_candidate(&self, candidate: &[isize], phase: Phase) -> Result<(), IOError> {
        if self.config.log_candidates {
            let mut buffer = self.stdout.buffer();
            buffer.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            write!(&mut buffer, "candidate")?;
            buffer.reset()?;
            writeln!(
                &mut buffer,
                ": point: {}, phase: {}, cpu-time: {}",
                PointPrinter::new(candidate),
                phase,
                ProcessTime::now().as_duration().as_secs_f32(),
            )?;
            self.stdout.print(&buffer)?;
        }
        Ok(())
    }

    fn ilog_oracle_call(&self, point: &[isize], feasible: bool, phase: Phase) -> Result<(), IOError> {
        if self.config.log_oracle_calls {
            let mut buffer = self.stdout.buffer();
            buffer.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            write!(&mut buffer, "oracle call")?;
            buffer.reset()?;
            writeln!(
                &mut buffer,
                ": point: {}, feasible: {}, phase: {}, cpu-time: {}",
                PointPrinter::new(point),
                feasible,
                phase,
                ProcessTime::now().as_duration().as_secs_f32(),
            )?;
            self.stdout.print(&buffer)?;
        }
        Ok(())
    }

    fn ilog_pareto_point(&self, point: &[isize]) -> Result<(), IOError> {
        if self.config.log_pareto_points {
            let mut buffer = self.stdout.buffer();
            buffer.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            write!(&mut buffer, "pareto point")?;
            buffer.reset()?;
            writeln!(
                &mut buffer,
                ": point: {}, cpu-time: {}",
                PointPrinter::new(point),
                ProcessTime::now().as_duration().as_secs_f32(),
            )?;
            self.stdout.print(&buffer)?;
        }
        Ok(())
    }
}

impl WriteEnumLog for CliLogger {
    fn log_candidate(&mut self, candidate: &[isize], phase: Phase) -> Result<(), LoggerError> {
        Self::wrap_error(self.ilog_candidate(candidate, phase))
    }

    fn log_oracle_call(
        &mut self,
        point: &[isize],
        feasible: bool,
        phase: Phase,
    ) -> Result<(), LoggerError> {
        Self::wrap_error(self.ilog_oracle_call(point, feasible, phase))
    }

    fn log_pareto_point(&mut self, point: &[isize]) -> Result<(), LoggerError> {
        Self::wrap_error(self.ilog_pareto_point(point))
    }
}

struct PointPrinter<'a> {
    point: &'a [isize],
}

impl<'a> PointPrinter<'a> {
    fn new(point: &'a [isize]) -> Self {
        PointPrinter { point }
    }
}

impl fmt::Display for PointPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        let mut first = true;
        for coord in self.point {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", coord)?;
            first = false;
        }
        write!(f, ")")
    }
}

#[test]
fn verify_cli_args() {
    use clap::CommandFactory;
    CliArgs::command().debug_assert()
}
