#![no_main]

use libfuzzer_sys::fuzz_target;
use plyview::projection::{ CanvasSize, ProjectionTransform };

fuzz_target!(|data: &[u8]| {
    if let Ok(cloud) = plyview::decode_points(data) {
        assert_eq!(cloud.samples.len(), cloud.header.vertex_count());
        if let Some(t) = ProjectionTransform::fit(&cloud.samples, CanvasSize::new(300.0, 300.0)) {
            assert!(t.scale.is_finite() && t.scale > 0.0);
        }
    }
});
