#![no_main]

use libfuzzer_sys::fuzz_target;
use portfolio_badge::PointerScript;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(script) = PointerScript::parse(json) {
        let count = script.expanded_frames().count();
        assert_eq!(count, script.frame_count());
        assert!(count <= portfolio_badge::app::replay::MAX_SCRIPT_FRAMES);
    }
});
