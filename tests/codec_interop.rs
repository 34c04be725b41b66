//! Byte-level vectors shared with the native firmware.

use radio_midi::protocol::{self, SYSEX_PACKET_SIZE};
use radio_midi::{DecodeError, MidiMessage, MidiStatus, SysExMessage};

#[test]
fn channel_voice_vectors() {
    let cases: &[(MidiMessage, &[u8])] = &[
        (MidiMessage::note_on(1, 60, 100), &[0x90, 0x3C, 0x64]),
        (MidiMessage::note_off(16, 60, 0), &[0x8F, 0x3C, 0x00]),
        (MidiMessage::control_change(10, 7, 127), &[0xB9, 0x07, 0x7F]),
        (MidiMessage::poly_aftertouch(2, 64, 33), &[0xA1, 0x40, 0x21]),
        (MidiMessage::program_change(1, 5), &[0xC0, 0x05]),
        (MidiMessage::channel_aftertouch(3, 90), &[0xD2, 0x5A]),
        (MidiMessage::pitch_bend(1, 0), &[0xE0, 0x00, 0x40]),
        (MidiMessage::pitch_bend(1, -8192), &[0xE0, 0x00, 0x00]),
        (MidiMessage::pitch_bend(1, 8191), &[0xE0, 0x7F, 0x7F]),
    ];

    for (message, bytes) in cases {
        assert_eq!(message.encode().as_bytes(), *bytes, "{message:?}");
        assert_eq!(protocol::decode(bytes).unwrap(), *message);
    }
}

#[test]
fn system_vectors() {
    let cases: &[(MidiMessage, &[u8])] = &[
        (MidiMessage::time_code(0x23), &[0xF1, 0x23]),
        (MidiMessage::song_position(1000), &[0xF2, 0x68, 0x07]),
        (MidiMessage::song_select(9), &[0xF3, 0x09]),
        (MidiMessage::TuneRequest, &[0xF6]),
        (MidiMessage::Clock, &[0xF8]),
        (MidiMessage::Start, &[0xFA]),
        (MidiMessage::Continue, &[0xFB]),
        (MidiMessage::Stop, &[0xFC]),
        (MidiMessage::ActiveSensing, &[0xFE]),
        (MidiMessage::SystemReset, &[0xFF]),
    ];

    for (message, bytes) in cases {
        assert_eq!(message.encode().as_bytes(), *bytes, "{message:?}");
        assert_eq!(protocol::decode(bytes).unwrap(), *message);
    }
}

#[test]
fn data_bytes_are_masked_not_rejected() {
    let packet = MidiMessage::note_on(1, 200, 255).encode();
    assert_eq!(packet.as_bytes(), &[0x90, 72, 127]);
}

#[test]
fn signed_pitch_bend_clamps() {
    let packet = MidiMessage::pitch_bend(1, 9000).encode();
    let decoded = protocol::decode(packet.as_bytes()).unwrap();
    assert_eq!(decoded.signed_pitch_bend(), Some(8191));

    let packet = MidiMessage::pitch_bend(1, i16::MIN).encode();
    let decoded = protocol::decode(packet.as_bytes()).unwrap();
    assert_eq!(decoded.signed_pitch_bend(), Some(-8192));
}

#[test]
fn short_packets_pad_with_zero() {
    assert_eq!(
        protocol::decode(&[0x91]).unwrap(),
        MidiMessage::note_on(2, 0, 0)
    );
    assert_eq!(
        protocol::decode(&[0xE0, 0x10]).unwrap(),
        MidiMessage::pitch_bend_raw(1, 0x10)
    );
}

#[test]
fn malformed_packets() {
    assert_eq!(protocol::decode(&[]), Err(DecodeError::Empty));
    assert_eq!(
        protocol::decode(&[0x40, 0x00]),
        Err(DecodeError::UnknownStatus { status: 0x40 })
    );
    for status in [0xF4, 0xF5, 0xF7, 0xF9, 0xFD, 0xF0] {
        assert_eq!(
            protocol::decode(&[status]),
            Err(DecodeError::UnknownStatus { status })
        );
    }
}

#[test]
fn sysex_container_layout() {
    let sysex = SysExMessage::new(vec![0x7E, 0x7F, 0x06, 0x01]).unwrap();
    let packet = MidiMessage::SysEx(sysex.clone()).encode();

    assert_eq!(packet.len(), SYSEX_PACKET_SIZE);
    assert_eq!(&packet.as_bytes()[..4], &[0x7E, 0x7F, 0x06, 0x01]);
    assert!(packet.as_bytes()[4..128].iter().all(|byte| *byte == 0));
    assert_eq!(packet.as_bytes()[128], 4);
    assert_eq!(protocol::decode_sysex(packet.as_bytes()).unwrap(), sysex);

    let mut bogus = packet.as_bytes().to_vec();
    bogus[128] = 200;
    assert_eq!(
        protocol::decode(&bogus),
        Err(DecodeError::InvalidSysExLength {
            declared: 200,
            max: 128
        })
    );
}

#[test]
fn status_table_matches_encoded_lengths() {
    let messages = [
        MidiMessage::note_on(1, 1, 1),
        MidiMessage::program_change(1, 1),
        MidiMessage::song_position(1),
        MidiMessage::song_select(1),
        MidiMessage::Clock,
    ];
    for message in messages {
        let status: MidiStatus = message.status();
        assert_eq!(message.encode().len(), status.packet_len(), "{status}");
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use radio_midi::protocol::MetricsSnapshot;
    use radio_midi::{MidiMessage, PeerAddress, SysExMessage, TransportConfig};

    #[test]
    fn oversized_sysex_payload_is_rejected() {
        let json = format!(r#"{{"payload":{:?}}}"#, vec![1u8; 200]);
        assert!(serde_json::from_str::<SysExMessage>(&json).is_err());

        let json = format!(r#"{{"SysEx":{{"payload":{:?}}}}}"#, vec![1u8; 129]);
        assert!(serde_json::from_str::<MidiMessage>(&json).is_err());

        let json = format!(r#"{{"payload":{:?}}}"#, vec![1u8; 128]);
        let sysex: SysExMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(MidiMessage::SysEx(sysex).encode().as_bytes()[128], 128);
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: TransportConfig = serde_json::from_str(r#"{"auto_discovery":true}"#).unwrap();
        assert!(config.auto_discovery);
        assert_eq!(config.max_peers, 20);
        assert!(!config.dispatch_sysex);
    }

    #[test]
    fn messages_and_addresses_serialize() {
        let messages = vec![
            MidiMessage::note_on(2, 60, 100),
            MidiMessage::Clock,
            MidiMessage::SysEx(SysExMessage::new(vec![1, 2, 3]).unwrap()),
        ];
        let json = serde_json::to_string(&messages).unwrap();
        let back: Vec<MidiMessage> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, messages);

        let address = PeerAddress::new([1, 2, 3, 4, 5, 6]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(serde_json::from_str::<PeerAddress>(&json).unwrap(), address);

        let snapshot = MetricsSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(serde_json::from_str::<MetricsSnapshot>(&json).unwrap(), snapshot);
    }
}
