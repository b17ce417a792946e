#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::PathBuf;
use tapdeck::audio::NullEngine;
use tapdeck::catalog::Catalog;
use tapdeck::core::{ControlId, DeckCore};
use tapdeck::model::Track;

fuzz_target!(|data: &[u8]| {
    let len = (data.len() % 16).max(1);
    let catalog = Catalog {
        tracks: (0..len)
            .map(|idx| Track::from_path(PathBuf::from(format!("track_{idx}.mp3"))))
            .collect(),
    };
    let mut core = DeckCore::new(catalog).expect("non-empty catalog");
    let mut engine = NullEngine::new();
    core.attach(&mut engine);

    for byte in data {
        match byte % 4 {
            0 => core.tap(&mut engine, ControlId::Play),
            1 => core.tap(&mut engine, ControlId::Stop),
            2 => core.tap(&mut engine, ControlId::Forward),
            _ => core.tap(&mut engine, ControlId::Previous),
        }
        assert!(core.cursor_index() < core.catalog().len());
    }
});
