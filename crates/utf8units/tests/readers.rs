#![allow(missing_docs)]
use std::io::Cursor;

use rstest::{fixture, rstest};
use utf8units::{
    BufferedUtf8Reader, DecodeError, DecoderOptions, UnitSink, Utf16Read, Utf8Reader,
};

const TEXT: &str = "Grüße, 世界! 🎉 — ascii runs long enough for the bulk path ……";

#[fixture]
fn expected() -> Vec<u16> {
    TEXT.encode_utf16().collect()
}

fn readers() -> Vec<Box<dyn Utf16Read>> {
    vec![
        Box::new(Utf8Reader::new(Cursor::new(TEXT.as_bytes().to_vec()))),
        Box::new(BufferedUtf8Reader::new(Cursor::new(TEXT.as_bytes().to_vec()))),
        Box::new(
            BufferedUtf8Reader::with_options(
                Cursor::new(TEXT.as_bytes().to_vec()),
                DecoderOptions {
                    buffer_size: 7,
                    ..DecoderOptions::default()
                },
            )
            .unwrap(),
        ),
    ]
}

#[rstest]
fn transfer_matches_encode_utf16(expected: Vec<u16>) {
    for mut reader in readers() {
        let mut units: Vec<u16> = Vec::new();
        let count = reader.transfer_to(&mut units).unwrap();
        assert_eq!(count, expected.len() as u64);
        assert_eq!(units, expected);
        reader.close().unwrap();
    }
}

#[test]
fn read_to_string_round_trips() {
    for mut reader in readers() {
        let mut out = String::new();
        assert_eq!(reader.read_to_string(&mut out).unwrap(), TEXT.len());
        assert_eq!(out, TEXT);
    }
}

/// Counts units and remembers the longest run it was handed.
#[derive(Default)]
struct Counting {
    units: usize,
    longest: usize,
}

impl UnitSink for Counting {
    fn write_units(&mut self, units: &[u16]) -> std::io::Result<()> {
        self.units += units.len();
        self.longest = self.longest.max(units.len());
        Ok(())
    }
}

#[rstest]
fn custom_sink(expected: Vec<u16>) {
    for mut reader in readers() {
        let mut sink = Counting::default();
        reader.transfer_to(&mut sink).unwrap();
        assert_eq!(sink.units, expected.len());
        assert!(sink.longest > 0);
    }
}

#[test]
fn sink_errors_surface_as_io() {
    struct Full;

    impl UnitSink for Full {
        fn write_units(&mut self, _: &[u16]) -> std::io::Result<()> {
            Err(std::io::ErrorKind::WriteZero.into())
        }
    }

    let mut reader = Utf8Reader::new(TEXT.as_bytes());
    assert!(matches!(
        reader.transfer_to(&mut Full),
        Err(DecodeError::Io(e)) if e.kind() == std::io::ErrorKind::WriteZero
    ));
}

#[test]
fn readers_are_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Utf8Reader<Cursor<Vec<u8>>>>();
    assert_send::<BufferedUtf8Reader<std::fs::File>>();
}

#[test]
fn drop_releases_the_source() {
    use std::rc::Rc;

    let source = Rc::new(());
    struct Tracked(#[allow(dead_code)] Rc<()>);
    impl std::io::Read for Tracked {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Ok(0)
        }
    }

    let mut reader = BufferedUtf8Reader::new(Tracked(Rc::clone(&source)));
    assert_eq!(Rc::strong_count(&source), 2);
    reader.close().unwrap();
    assert_eq!(Rc::strong_count(&source), 1);

    {
        let _reader = Utf8Reader::new(Tracked(Rc::clone(&source)));
        assert_eq!(Rc::strong_count(&source), 2);
    }
    assert_eq!(Rc::strong_count(&source), 1);
}
