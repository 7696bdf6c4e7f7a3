#![no_main]

use libfuzzer_sys::fuzz_target;
use minemap_editor::core::MapSettings;
use minemap_editor::{MapModel, RetainedScene};

fuzz_target!(|data: &[u8]| {
    // Beliebige Bytes duerfen den Parser nicht zum Absturz bringen
    let mut model = MapModel::new(RetainedScene::new(false), MapSettings::default());
    model.parse_map_data(data, "fuzz.json");
    let _ = pollster::block_on(model.draw_map());
});
