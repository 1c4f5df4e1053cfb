// Failed decodes are reported through the returned error; the crate only
// traces at debug level and never reaches warn or error.
#![cfg(feature = "zlib")]

mod common;

use std::sync::Mutex;

use common::{Encoder, PNG_SIG, ihdr, push_chunk};
use log::{Level, LevelFilter, Log, Metadata, Record};
use smol_png::{DecodeError, DecodeOptions, ImageHandle, decode};

struct Recorder {
    levels: Mutex<Vec<Level>>,
}

impl Log for Recorder {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.target().starts_with("smol_png") {
            if let Ok(mut levels) = self.levels.lock() {
                levels.push(record.level());
            }
        }
    }

    fn flush(&self) {}
}

static RECORDER: Recorder = Recorder {
    levels: Mutex::new(Vec::new()),
};

#[test]
fn failures_stay_below_warn() {
    log::set_logger(&RECORDER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let enc = Encoder::new(8, 8, 8, 0);
    let good = enc.encode(&[7; 64]);

    let mut no_data = PNG_SIG.to_vec();
    push_chunk(&mut no_data, b"IHDR", &ihdr(1, 1, 8, 0, 0));
    let mut corrupt = good.clone();
    corrupt[41] ^= 0xFF;

    assert_eq!(decode(b"not a png").unwrap_err(), DecodeError::NotAPng);
    assert!(decode(&no_data).is_err());
    assert!(decode(&corrupt).is_err());

    let mut handle = ImageHandle::new();
    let small = DecodeOptions::new().with_max_pixels(10);
    assert_eq!(
        handle.decode_into(&good, &small, &mut smol_png::ZlibInflater),
        Err(DecodeError::OutOfMemory)
    );
    assert!(decode(&good).is_ok());

    let levels = RECORDER.levels.lock().unwrap();
    assert!(!levels.is_empty(), "failures are still traced");
    assert!(
        levels.iter().all(|&level| level >= Level::Debug),
        "logged above debug: {levels:?}"
    );
}
