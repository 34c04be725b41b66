//! Per-message-kind callback slots.

use std::fmt;

use crate::protocol::{MidiMessage, SysExMessage};

type VoiceHandler = Box<dyn FnMut(u8, u8, u8)>;
type ChannelValueHandler = Box<dyn FnMut(u8, u8)>;
type PitchBendHandler = Box<dyn FnMut(u8, i16)>;
type ValueHandler = Box<dyn FnMut(u8)>;
type PositionHandler = Box<dyn FnMut(u16)>;
type SignalHandler = Box<dyn FnMut()>;
type SysExHandler = Box<dyn FnMut(&SysExMessage)>;

/// One optional callback per message kind.
///
/// Unset slots are no-ops. Callbacks run synchronously on the thread that
/// calls [`dispatch`](Self::dispatch), in packet arrival order.
#[derive(Default)]
pub struct HandlerTable {
    note_on: Option<VoiceHandler>,
    note_off: Option<VoiceHandler>,
    control_change: Option<VoiceHandler>,
    poly_aftertouch: Option<VoiceHandler>,
    program_change: Option<ChannelValueHandler>,
    channel_aftertouch: Option<ChannelValueHandler>,
    pitch_bend: Option<PitchBendHandler>,
    song_position: Option<PositionHandler>,
    song_select: Option<ValueHandler>,
    time_code: Option<ValueHandler>,
    tune_request: Option<SignalHandler>,
    clock: Option<SignalHandler>,
    start: Option<SignalHandler>,
    continue_: Option<SignalHandler>,
    stop: Option<SignalHandler>,
    active_sensing: Option<SignalHandler>,
    system_reset: Option<SignalHandler>,
    sysex: Option<SysExHandler>,
}

impl HandlerTable {
    /// Create a table with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Note On: `(channel, note, velocity)`.
    pub fn on_note_on(&mut self, handler: impl FnMut(u8, u8, u8) + 'static) -> &mut Self {
        self.note_on = Some(Box::new(handler));
        self
    }

    /// Note Off: `(channel, note, velocity)`.
    pub fn on_note_off(&mut self, handler: impl FnMut(u8, u8, u8) + 'static) -> &mut Self {
        self.note_off = Some(Box::new(handler));
        self
    }

    /// Control Change: `(channel, control, value)`.
    pub fn on_control_change(&mut self, handler: impl FnMut(u8, u8, u8) + 'static) -> &mut Self {
        self.control_change = Some(Box::new(handler));
        self
    }

    /// Polyphonic aftertouch: `(channel, note, pressure)`.
    pub fn on_poly_aftertouch(&mut self, handler: impl FnMut(u8, u8, u8) + 'static) -> &mut Self {
        self.poly_aftertouch = Some(Box::new(handler));
        self
    }

    /// Program Change: `(channel, program)`.
    pub fn on_program_change(&mut self, handler: impl FnMut(u8, u8) + 'static) -> &mut Self {
        self.program_change = Some(Box::new(handler));
        self
    }

    /// Channel aftertouch: `(channel, pressure)`.
    pub fn on_channel_aftertouch(&mut self, handler: impl FnMut(u8, u8) + 'static) -> &mut Self {
        self.channel_aftertouch = Some(Box::new(handler));
        self
    }

    /// Pitch bend: `(channel, signed value)` where 0 is center.
    pub fn on_pitch_bend(&mut self, handler: impl FnMut(u8, i16) + 'static) -> &mut Self {
        self.pitch_bend = Some(Box::new(handler));
        self
    }

    /// Song position pointer: `(position)`.
    pub fn on_song_position(&mut self, handler: impl FnMut(u16) + 'static) -> &mut Self {
        self.song_position = Some(Box::new(handler));
        self
    }

    /// Song select: `(song)`.
    pub fn on_song_select(&mut self, handler: impl FnMut(u8) + 'static) -> &mut Self {
        self.song_select = Some(Box::new(handler));
        self
    }

    /// MTC quarter frame: `(value)`.
    pub fn on_time_code(&mut self, handler: impl FnMut(u8) + 'static) -> &mut Self {
        self.time_code = Some(Box::new(handler));
        self
    }

    /// Tune request.
    pub fn on_tune_request(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.tune_request = Some(Box::new(handler));
        self
    }

    /// Timing clock.
    pub fn on_clock(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.clock = Some(Box::new(handler));
        self
    }

    /// Transport start.
    pub fn on_start(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.start = Some(Box::new(handler));
        self
    }

    /// Transport continue.
    pub fn on_continue(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.continue_ = Some(Box::new(handler));
        self
    }

    /// Transport stop.
    pub fn on_stop(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.stop = Some(Box::new(handler));
        self
    }

    /// Active sensing.
    pub fn on_active_sensing(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.active_sensing = Some(Box::new(handler));
        self
    }

    /// System reset.
    pub fn on_system_reset(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.system_reset = Some(Box::new(handler));
        self
    }

    /// SysEx payload. Only reached when SysEx dispatch is enabled.
    pub fn on_sysex(&mut self, handler: impl FnMut(&SysExMessage) + 'static) -> &mut Self {
        self.sysex = Some(Box::new(handler));
        self
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Invoke the slot matching `message`. Returns whether a handler ran.
    pub fn dispatch(&mut self, message: &MidiMessage) -> bool {
        match message {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => call3(&mut self.note_on, *channel, *note, *velocity),
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => call3(&mut self.note_off, *channel, *note, *velocity),
            MidiMessage::ControlChange {
                channel,
                control,
                value,
            } => call3(&mut self.control_change, *channel, *control, *value),
            MidiMessage::PolyAftertouch {
                channel,
                note,
                pressure,
            } => call3(&mut self.poly_aftertouch, *channel, *note, *pressure),
            MidiMessage::ProgramChange { channel, program } => {
                call2(&mut self.program_change, *channel, *program)
            }
            MidiMessage::ChannelAftertouch { channel, pressure } => {
                call2(&mut self.channel_aftertouch, *channel, *pressure)
            }
            MidiMessage::PitchBend { channel, .. } => {
                match (&mut self.pitch_bend, message.signed_pitch_bend()) {
                    (Some(handler), Some(signed)) => {
                        handler(*channel, signed);
                        true
                    }
                    _ => false,
                }
            }
            MidiMessage::SongPosition { position } => match &mut self.song_position {
                Some(handler) => {
                    handler(*position);
                    true
                }
                None => false,
            },
            MidiMessage::SongSelect { song } => call1(&mut self.song_select, *song),
            MidiMessage::TimeCode { value } => call1(&mut self.time_code, *value),
            MidiMessage::TuneRequest => call0(&mut self.tune_request),
            MidiMessage::Clock => call0(&mut self.clock),
            MidiMessage::Start => call0(&mut self.start),
            MidiMessage::Continue => call0(&mut self.continue_),
            MidiMessage::Stop => call0(&mut self.stop),
            MidiMessage::ActiveSensing => call0(&mut self.active_sensing),
            MidiMessage::SystemReset => call0(&mut self.system_reset),
            MidiMessage::SysEx(sysex) => match &mut self.sysex {
                Some(handler) => {
                    handler(sysex);
                    true
                }
                None => false,
            },
        }
    }
}

fn call3(slot: &mut Option<VoiceHandler>, a: u8, b: u8, c: u8) -> bool {
    let Some(handler) = slot else { return false };
    handler(a, b, c);
    true
}

fn call2(slot: &mut Option<ChannelValueHandler>, a: u8, b: u8) -> bool {
    let Some(handler) = slot else { return false };
    handler(a, b);
    true
}

fn call1(slot: &mut Option<ValueHandler>, a: u8) -> bool {
    let Some(handler) = slot else { return false };
    handler(a);
    true
}

fn call0(slot: &mut Option<SignalHandler>) -> bool {
    let Some(handler) = slot else { return false };
    handler();
    true
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("note_on", &self.note_on.is_some())
            .field("note_off", &self.note_off.is_some())
            .field("control_change", &self.control_change.is_some())
            .field("pitch_bend", &self.pitch_bend.is_some())
            .field("clock", &self.clock.is_some())
            .field("sysex", &self.sysex.is_some())
            .finish_non_exhaustive()
    }
}
