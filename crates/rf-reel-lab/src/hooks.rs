//! Presentation hooks — the seams between the engine and whatever draws or plays it
//!
//! The engine never renders or loads audio. It moves symbol offsets, emits
//! [`StageEvent`]s, and leaves the rest to implementations of these traits.
//!
//! ## Flow
//!
//! ```text
//! GameController ──drain_events()──► StageDispatcher ──► AudioSink
//!        │                                          └──► Presentation
//!        └──sync_scene()──► Scene
//! ```

use rf_stage::{RejectReason, SoundCommand, SoundId, Stage, StageEvent, WinLine, WinOutcome};

use crate::symbols::SymbolKind;

/// Receives symbol geometry and kind updates
pub trait Scene {
    /// A symbol instance was assigned a new kind
    fn set_symbol_kind(&mut self, reel: u8, instance: u8, kind: SymbolKind);

    /// Vertical offset of a symbol instance along its track
    fn set_symbol_offset(&mut self, reel: u8, instance: u8, offset: f64);
}

/// Plays logical sounds
///
/// Every method is fire-and-forget; failures stay inside the sink.
pub trait AudioSink {
    fn play(&mut self, sound: SoundId);

    fn start_loop(&mut self, sound: SoundId);

    fn stop_loop(&mut self, sound: SoundId);
}

/// Credit display, rejection feedback and win highlighting
pub trait Presentation {
    fn credit_changed(&mut self, balance: u64);

    fn spin_rejected(&mut self, reason: RejectReason, balance: u64);

    /// A reel settled showing `symbols` (top to bottom)
    fn reel_stopped(&mut self, _reel: u8, _symbols: &[u32]) {}

    /// Spin settled; `lines` is empty on a loss
    fn spin_result(&mut self, lines: &[WinLine], outcome: WinOutcome, payout: u64);
}

/// Routes drained stage events to the hook traits
///
/// Win lines are buffered until the `SpinEnd` that closes their spin, so
/// presentation receives the whole result at once.
#[derive(Debug, Default)]
pub struct StageDispatcher {
    pending_lines: Vec<WinLine>,
    dispatched: u64,
}

impl StageDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events routed so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Route a batch of events in order
    pub fn dispatch(
        &mut self,
        events: &[StageEvent],
        audio: &mut dyn AudioSink,
        presentation: &mut dyn Presentation,
    ) {
        for event in events {
            self.dispatch_one(event, audio, presentation);
        }
    }

    fn dispatch_one(
        &mut self,
        event: &StageEvent,
        audio: &mut dyn AudioSink,
        presentation: &mut dyn Presentation,
    ) {
        self.dispatched += 1;
        match &event.stage {
            Stage::Sound { command } => match *command {
                SoundCommand::Play { sound } => audio.play(sound),
                SoundCommand::Loop { sound } => audio.start_loop(sound),
                SoundCommand::Stop { sound } => audio.stop_loop(sound),
            },
            Stage::CreditChanged { balance } => presentation.credit_changed(*balance),
            Stage::SpinRejected { reason, balance } => {
                presentation.spin_rejected(*reason, *balance)
            }
            Stage::SpinStart { .. } => self.pending_lines.clear(),
            Stage::ReelStop {
                reel_index,
                symbols,
            } => presentation.reel_stopped(*reel_index, symbols),
            Stage::WinLineShow { line } => self.pending_lines.push(line.clone()),
            Stage::SpinEnd { outcome, payout } => {
                let lines = std::mem::take(&mut self.pending_lines);
                presentation.spin_result(&lines, *outcome, *payout);
            }
            Stage::ReelStopping { .. }
            | Stage::Recharge { .. }
            | Stage::EvaluateWins
            | Stage::NoWin
            | Stage::BigWin { .. } => {
                log::trace!("Stage {} has no hook", event.type_name());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingAudio {
        log: Vec<String>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, sound: SoundId) {
            self.log.push(format!("play:{}", sound.asset_name()));
        }

        fn start_loop(&mut self, sound: SoundId) {
            self.log.push(format!("loop:{}", sound.asset_name()));
        }

        fn stop_loop(&mut self, sound: SoundId) {
            self.log.push(format!("stop:{}", sound.asset_name()));
        }
    }

    #[derive(Default)]
    struct RecordingPresentation {
        balances: Vec<u64>,
        rejections: Vec<(RejectReason, u64)>,
        results: Vec<(usize, WinOutcome, u64)>,
        reels: Vec<u8>,
    }

    impl Presentation for RecordingPresentation {
        fn credit_changed(&mut self, balance: u64) {
            self.balances.push(balance);
        }

        fn spin_rejected(&mut self, reason: RejectReason, balance: u64) {
            self.rejections.push((reason, balance));
        }

        fn reel_stopped(&mut self, reel: u8, _symbols: &[u32]) {
            self.reels.push(reel);
        }

        fn spin_result(&mut self, lines: &[WinLine], outcome: WinOutcome, payout: u64) {
            self.results.push((lines.len(), outcome, payout));
        }
    }

    fn line(row: u8) -> WinLine {
        WinLine {
            row_index: row,
            symbol_id: 0,
            symbol_name: None,
            start_reel: 0,
            run_length: 2,
            payout: 1,
            positions: vec![],
        }
    }

    fn ev(stage: Stage) -> StageEvent {
        StageEvent::new(stage, 0.0)
    }

    #[test]
    fn test_routes_sound_commands() {
        let mut dispatcher = StageDispatcher::new();
        let mut audio = RecordingAudio::default();
        let mut presentation = RecordingPresentation::default();

        dispatcher.dispatch(
            &[
                ev(Stage::Sound {
                    command: SoundCommand::Loop {
                        sound: SoundId::SpinLoop,
                    },
                }),
                ev(Stage::Sound {
                    command: SoundCommand::Play {
                        sound: SoundId::ReelStop,
                    },
                }),
                ev(Stage::Sound {
                    command: SoundCommand::Stop {
                        sound: SoundId::SpinLoop,
                    },
                }),
            ],
            &mut audio,
            &mut presentation,
        );

        assert_eq!(audio.log, vec!["loop:spin", "play:reel-stop", "stop:spin"]);
        assert_eq!(dispatcher.dispatched(), 3);
    }

    #[test]
    fn test_win_lines_delivered_at_spin_end() {
        let mut dispatcher = StageDispatcher::new();
        let mut audio = RecordingAudio::default();
        let mut presentation = RecordingPresentation::default();

        dispatcher.dispatch(
            &[
                ev(Stage::SpinStart { cost: 2 }),
                ev(Stage::ReelStop {
                    reel_index: 0,
                    symbols: vec![1, 2, 3],
                }),
                ev(Stage::WinLineShow { line: line(0) }),
                ev(Stage::WinLineShow { line: line(2) }),
            ],
            &mut audio,
            &mut presentation,
        );
        assert!(presentation.results.is_empty());

        dispatcher.dispatch(
            &[
                ev(Stage::CreditChanged { balance: 50 }),
                ev(Stage::SpinEnd {
                    outcome: WinOutcome::Win,
                    payout: 2,
                }),
            ],
            &mut audio,
            &mut presentation,
        );

        assert_eq!(presentation.results, vec![(2, WinOutcome::Win, 2)]);
        assert_eq!(presentation.balances, vec![50]);
        assert_eq!(presentation.reels, vec![0]);
    }

    #[test]
    fn test_rejection_and_recharge() {
        let mut dispatcher = StageDispatcher::new();
        let mut audio = RecordingAudio::default();
        let mut presentation = RecordingPresentation::default();

        dispatcher.dispatch(
            &[
                ev(Stage::SpinRejected {
                    reason: RejectReason::InsufficientCredit,
                    balance: 1,
                }),
                ev(Stage::Recharge { balance: 50 }),
                ev(Stage::CreditChanged { balance: 50 }),
            ],
            &mut audio,
            &mut presentation,
        );

        assert_eq!(
            presentation.rejections,
            vec![(RejectReason::InsufficientCredit, 1)]
        );
        assert_eq!(presentation.balances, vec![50]);
        assert!(audio.log.is_empty());
    }
}
