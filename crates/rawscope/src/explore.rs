//! Line-oriented explorer session.
//!
//! Each input line is one command. Slice and threshold commands become
//! [`InteractionEvent`]s for the [`Controller`], which redraws synchronously
//! before the next line is read.

use std::io::{BufRead, Write};
use std::str::FromStr;

use rawscope_core::{Controller, InteractionEvent, InteractionState, Options, RenderTarget, Result};
use rawscope_render::{ColorMapRegistry, PngFrameSink};

use crate::pipeline::load_volume;

pub const HELP: &str = "\
commands:
  slice <n>             show slice n (clamped to the volume)
  level <x>             set the iso-contour threshold (clamped to [0, 1])
  threshold <x>         same as level
  show                  redraw the current frame
  help                  show this message
  quit | exit           end the session";

/// A parsed session command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Slice(i64),
    Threshold(f32),
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments: '{line}'"));
        }

        match (name.as_str(), arg) {
            ("slice" | "s", Some(n)) => n
                .parse()
                .map(Command::Slice)
                .map_err(|_| format!("invalid slice index '{n}'")),
            ("level" | "threshold" | "l", Some(x)) => x
                .parse()
                .map(Command::Threshold)
                .map_err(|_| format!("invalid threshold '{x}'")),
            ("slice" | "s" | "level" | "threshold" | "l", None) => {
                Err(format!("'{name}' needs a value"))
            }
            ("show", None) => Ok(Command::Show),
            ("help" | "?", None) => Ok(Command::Help),
            ("quit" | "exit" | "q", None) => Ok(Command::Quit),
            _ => Err(format!("unknown command '{line}'")),
        }
    }
}

impl Command {
    /// The controller event for this command, if any.
    pub fn event(self) -> Option<InteractionEvent> {
        match self {
            Command::Slice(n) => Some(InteractionEvent::SliceChanged(n)),
            Command::Threshold(t) => Some(InteractionEvent::ThresholdChanged(t)),
            Command::Show | Command::Help | Command::Quit => None,
        }
    }
}

/// Outcome of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerSummary {
    pub final_state: InteractionState,
    /// Frames presented, including the first one.
    pub redraws: usize,
    /// Lines that parsed as commands.
    pub commands: usize,
    /// Lines that did not.
    pub rejected: usize,
}

/// Feeds commands from `input` to `controller` until `quit` or end of input.
///
/// Unknown or malformed commands are reported on `output` and skipped.
pub fn run_session<T: RenderTarget>(
    controller: &mut Controller<'_, T>,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<ExplorerSummary> {
    let mut commands = 0;
    let mut rejected = 0;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(message) => {
                rejected += 1;
                writeln!(output, "{message} (type 'help' for commands)")?;
                continue;
            }
        };
        commands += 1;

        match command {
            Command::Quit => break,
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Show => {
                controller.redraw()?;
                writeln!(output, "{}", controller.state().title())?;
            }
            Command::Slice(_) | Command::Threshold(_) => {
                if let Some(event) = command.event() {
                    let state = controller.handle(event)?;
                    writeln!(output, "{}", state.title())?;
                }
            }
        }
    }

    Ok(ExplorerSummary {
        final_state: controller.state(),
        redraws: controller.redraw_count(),
        commands,
        rejected,
    })
}

/// Loads the configured volume, scales it to unit range and runs a session
/// that writes PNG frames into `options.output_dir`.
pub fn run_explorer(
    options: &Options,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<ExplorerSummary> {
    let loaded = load_volume(options)?;
    let normalized = loaded.volume.to_unit_range();

    let color_map = ColorMapRegistry::new().require(&options.colormap)?.clone();
    let sink = PngFrameSink::new(&options.output_dir)?
        .with_color_map(color_map)
        .with_contour_color(options.contour_color)
        .with_scale(options.scale)
        .keep_frames(options.keep_frames);
    writeln!(output, "writing frames to {}", sink.current_path().display())?;

    let mut controller = Controller::new(&normalized, options.initial_state(), sink);
    controller.redraw()?;
    writeln!(output, "{}", controller.state().title())?;

    run_session(&mut controller, input, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawscope_core::{Frame, NormalizedVolume, VoxelGridSpec};

    #[derive(Default)]
    struct Count(usize);

    impl RenderTarget for Count {
        fn present(&mut self, _frame: &Frame<'_>) -> Result<()> {
            self.0 += 1;
            Ok(())
        }
    }

    fn volume() -> NormalizedVolume {
        let grid = VoxelGridSpec::new(109, 4, 4).unwrap();
        NormalizedVolume::new(grid, 1, vec![0.5; grid.voxel_count()]).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("slice 150".parse(), Ok(Command::Slice(150)));
        assert_eq!("  SLICE -3 ".parse(), Ok(Command::Slice(-3)));
        assert_eq!("level 0.25".parse(), Ok(Command::Threshold(0.25)));
        assert_eq!("threshold 1".parse(), Ok(Command::Threshold(1.0)));
        assert_eq!("show".parse(), Ok(Command::Show));
        assert_eq!("exit".parse(), Ok(Command::Quit));
        assert!("slice".parse::<Command>().is_err());
        assert!("slice x".parse::<Command>().is_err());
        assert!("slice 1 2".parse::<Command>().is_err());
        assert!("zoom 2".parse::<Command>().is_err());
    }

    #[test]
    fn test_session_applies_events() {
        let volume = volume();
        let state = InteractionState::initial(volume.grid(), Some(30), 0.2);
        let mut controller = Controller::new(&volume, state, Count::default());
        let input = "slice 150\nbogus\n\nlevel 0.7\nhelp\nquit\nslice 3\n";
        let mut output = Vec::new();

        let summary = run_session(&mut controller, input.as_bytes(), &mut output).unwrap();
        assert_eq!(summary.final_state.slice_index, 108);
        assert_eq!(summary.final_state.threshold, 0.7);
        assert_eq!(summary.redraws, 2);
        assert_eq!(summary.commands, 4);
        assert_eq!(summary.rejected, 1);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Slice 108: Iso-Contour @ 0.200"));
        assert!(text.contains("unknown command 'bogus'"));
        assert!(text.contains("Slice 108: Iso-Contour @ 0.700"));
        assert!(text.contains("commands:"));
    }

    #[test]
    fn test_session_ends_at_eof() {
        let volume = volume();
        let state = InteractionState::initial(volume.grid(), None, 0.2);
        let mut controller = Controller::new(&volume, state, Count::default());
        let summary = run_session(&mut controller, "show\n".as_bytes(), Vec::new()).unwrap();
        assert_eq!(summary.redraws, 1);
        assert_eq!(summary.final_state.slice_index, 54);
    }
}
