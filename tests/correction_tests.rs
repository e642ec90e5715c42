use flip_image::correction::{correct, correct_checked, image_width};
use flip_image::geometry::{BoundingBox, CorrectionResult, NaturalSize, Rotation, SizingMode};

const EPS: f64 = 1e-6;

fn bx(width: f64, height: f64) -> BoundingBox {
    BoundingBox::new(0.0, 0.0, width, height)
}

fn assert_close(got: CorrectionResult, w: f64, x: f64, y: f64) {
    assert!((got.w - w).abs() < EPS, "w mismatch: {got:?} vs ({w}, {x}, {y})");
    assert!((got.x - x).abs() < EPS, "x mismatch: {got:?} vs ({w}, {x}, {y})");
    assert!((got.y - y).abs() < EPS, "y mismatch: {got:?} vs ({w}, {x}, {y})");
}

#[test]
fn thumbnail_to_landscape_cover_needs_no_scale() {
    // img aspect 1.5; img_width = max(400, 300 * 1.5) = 450
    // x = (1 / 1.333) * min(1.333, 1.5) = 1, y = (300 / 450) * 1.5 = 1
    let r = correct(
        &BoundingBox::new(100.0, 50.0, 80.0, 60.0).offset_from(&bx(400.0, 300.0)),
        &bx(400.0, 300.0),
        &NaturalSize::new(1200, 800),
        Rotation::Upright,
        SizingMode::Cover,
    );
    assert_close(r, 450.0, 1.0, 1.0);
}

#[test]
fn upright_fixtures() {
    let nat = NaturalSize::new(1200, 800);
    let last = bx(400.0, 300.0);

    // contain: img_width = min(400, 450) = 400
    let r = correct(&bx(80.0, 60.0), &last, &nat, Rotation::Upright, SizingMode::Contain);
    assert_close(r, 400.0, 1.125, 1.125);

    // portrait thumbnail
    let r = correct(&bx(60.0, 90.0), &last, &nat, Rotation::Upright, SizingMode::Cover);
    assert_close(r, 450.0, 2.0, 1.0);

    // first wider than the image: x takes the width ratio
    let r = correct(&bx(200.0, 100.0), &last, &nat, Rotation::Upright, SizingMode::Cover);
    assert_close(r, 450.0, 400.0 / 450.0, 4.0 / 3.0);
}

#[test]
fn half_turn_matches_upright() {
    let first = bx(60.0, 90.0);
    let last = bx(400.0, 300.0);
    let nat = NaturalSize::new(4032, 3024);
    for sizing in [SizingMode::Cover, SizingMode::Contain] {
        assert_eq!(
            correct(&first, &last, &nat, Rotation::Half, sizing),
            correct(&first, &last, &nat, Rotation::Upright, sizing)
        );
    }
}

#[test]
fn sideways_landscape_photo_fixtures() {
    let nat = NaturalSize::new(4032, 3024);
    let thumb = bx(80.0, 60.0);

    let r = correct(&thumb, &bx(400.0, 300.0), &nat, Rotation::Clockwise, SizingMode::Cover);
    assert_close(r, 1600.0 / 3.0, 1.0, 1.0);

    let r = correct(&thumb, &bx(300.0, 500.0), &nat, Rotation::Clockwise, SizingMode::Cover);
    assert_close(r, 500.0, 16.0 / 9.0, 0.8);

    let ccw = Rotation::CounterClockwise;
    let r = correct(&thumb, &bx(400.0, 300.0), &nat, ccw, SizingMode::Contain);
    assert_close(r, 300.0, 16.0 / 9.0, 16.0 / 9.0);

    let r = correct(&thumb, &bx(300.0, 500.0), &nat, ccw, SizingMode::Contain);
    assert_close(r, 400.0, 20.0 / 9.0, 1.0);
}

#[test]
fn sideways_portrait_photo_on_screens() {
    // 3024x4032 phone portrait shot, played onto 1080p screens.
    let nat = NaturalSize::new(3024, 4032);
    let thumb = bx(60.0, 80.0);
    let landscape = bx(1920.0, 1080.0);
    let portrait = bx(1080.0, 1920.0);

    let r = correct(&thumb, &landscape, &nat, Rotation::Clockwise, SizingMode::Cover);
    assert_close(r, 1440.0, 0.75, 16.0 / 9.0);

    let r = correct(&thumb, &portrait, &nat, Rotation::Clockwise, SizingMode::Cover);
    assert_close(r, 1920.0, 1.0, 0.75);

    let r = correct(&thumb, &landscape, &nat, Rotation::Clockwise, SizingMode::Contain);
    assert_close(r, 1080.0, 1.0, 64.0 / 27.0);

    let r = correct(&thumb, &portrait, &nat, Rotation::Clockwise, SizingMode::Contain);
    assert_close(r, 810.0, 64.0 / 27.0, 16.0 / 9.0);
}

#[test]
fn upright_width_ignores_first_box() {
    let last = bx(640.0, 360.0);
    let nat = NaturalSize::new(3000, 2000);
    for sizing in [SizingMode::Cover, SizingMode::Contain] {
        let expected = image_width(&last, nat.aspect(), sizing);
        for first in [bx(10.0, 10.0), bx(300.0, 50.0), bx(40.0, 200.0)] {
            let r = correct(&first, &last, &nat, Rotation::Upright, sizing);
            assert!((r.w - expected).abs() < EPS);
        }
    }
}

#[test]
fn identical_boxes_need_no_cover_correction() {
    let nat = NaturalSize::new(1200, 800);
    for b in [bx(400.0, 300.0), bx(300.0, 400.0), bx(900.0, 300.0), bx(250.0, 250.0)] {
        let r = correct(&b, &b, &nat, Rotation::Upright, SizingMode::Cover);
        assert!((r.x - 1.0).abs() < EPS, "{b:?} -> {r:?}");
        assert!((r.y - 1.0).abs() < EPS, "{b:?} -> {r:?}");
    }
}

#[test]
fn identical_boxes_keep_contain_uniform() {
    let nat = NaturalSize::new(1200, 800);
    for b in [bx(400.0, 300.0), bx(300.0, 400.0), bx(900.0, 300.0)] {
        let r = correct(&b, &b, &nat, Rotation::Upright, SizingMode::Contain);
        assert!((r.x - r.y).abs() < EPS, "{b:?} -> {r:?}");
    }
}

#[test]
fn cover_is_never_narrower_than_contain() {
    for (w, h) in [(400.0, 300.0), (300.0, 400.0), (500.0, 500.0), (1920.0, 1080.0)] {
        for aspect in [0.5, 0.75, 1.0, 1.5, 2.0] {
            let last = bx(w, h);
            assert!(
                image_width(&last, aspect, SizingMode::Cover)
                    >= image_width(&last, aspect, SizingMode::Contain)
            );
        }
    }
}

#[test]
fn results_are_finite_and_positive_everywhere() {
    let dims = [
        (30.0, 90.0),
        (60.0, 80.0),
        (100.0, 100.0),
        (80.0, 60.0),
        (160.0, 40.0),
    ];
    let lasts = [
        (1920.0, 1080.0),
        (1080.0, 1920.0),
        (500.0, 500.0),
        (400.0, 300.0),
        (300.0, 500.0),
        (1200.0, 400.0),
    ];
    let naturals = [
        NaturalSize::new(4032, 3024),
        NaturalSize::new(3024, 4032),
        NaturalSize::new(1000, 1000),
        NaturalSize::new(6000, 1000),
        NaturalSize::new(800, 2400),
    ];
    let rotations = [
        Rotation::Upright,
        Rotation::Half,
        Rotation::Clockwise,
        Rotation::CounterClockwise,
    ];
    for &(fw, fh) in &dims {
        for &(lw, lh) in &lasts {
            for nat in &naturals {
                for rot in rotations {
                    for sizing in [SizingMode::Cover, SizingMode::Contain] {
                        let r = correct_checked(&bx(fw, fh), &bx(lw, lh), nat, rot, sizing)
                            .unwrap_or_else(|e| {
                                panic!("{fw}x{fh} -> {lw}x{lh} {nat:?} {rot:?} {sizing}: {e}")
                            });
                        assert!(r.w > 0.0 && r.x > 0.0 && r.y > 0.0, "{r:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn every_sideways_family_is_reachable() {
    let nat = NaturalSize::new(4032, 3024);
    let first = bx(80.0, 60.0);
    let landscape = bx(400.0, 300.0);
    let portrait = bx(300.0, 400.0);
    let lh = landscape.height;
    let img_w_cover_land = image_width(&landscape, nat.aspect(), SizingMode::Cover);
    let img_w_cover_port = image_width(&portrait, nat.aspect(), SizingMode::Cover);
    let img_w_contain_port = image_width(&portrait, nat.aspect(), SizingMode::Contain);

    for rot in [Rotation::Clockwise, Rotation::CounterClockwise] {
        // Each family has a distinct width formula.
        let r = correct(&first, &landscape, &nat, rot, SizingMode::Cover);
        assert!((r.w - img_w_cover_land * nat.aspect()).abs() < EPS);

        let r = correct(&first, &portrait, &nat, rot, SizingMode::Cover);
        let expected = portrait.height.max(img_w_cover_port * portrait.aspect());
        assert!((r.w - expected).abs() < EPS);

        let r = correct(&first, &landscape, &nat, rot, SizingMode::Contain);
        assert!((r.w - lh).abs() < EPS);

        let r = correct(&first, &portrait, &nat, rot, SizingMode::Contain);
        let expected = portrait.height.min(img_w_contain_port * nat.aspect());
        assert!((r.w - expected).abs() < EPS);
    }
}

#[test]
fn degenerate_inputs_are_non_finite_unless_checked() {
    let r = correct(
        &bx(0.0, 0.0),
        &bx(400.0, 300.0),
        &NaturalSize::new(1200, 800),
        Rotation::Upright,
        SizingMode::Cover,
    );
    assert!(!r.is_finite());
    assert!(
        correct_checked(
            &bx(0.0, 0.0),
            &bx(400.0, 300.0),
            &NaturalSize::new(1200, 800),
            Rotation::Upright,
            SizingMode::Cover,
        )
        .is_err()
    );
}

/// One measured play per reachable return in the correction tables, with
/// values worked out independently. Where a note lists ties, the compared
/// quantities are exactly equal and `>` versus `>=` changes the result.
struct Case {
    note: &'static str,
    first: (f64, f64),
    last: (f64, f64),
    natural: (u32, u32),
    rotation: Rotation,
    sizing: SizingMode,
    expect: (f64, f64, f64),
}

fn branch_cases() -> Vec<Case> {
    vec![
        Case {
            note: "cover landscape x#6 y#5; ties: square last, first == img",
            first: (10.0, 20.0),
            last: (100.0, 100.0),
            natural: (1, 2),
            rotation: Rotation::Clockwise,
            sizing: SizingMode::Cover,
            expect: (50.0, 2.0, 4.0),
        },
        Case {
            note: "cover portrait x#3 y#7; ties: first == img",
            first: (10.0, 20.0),
            last: (100.0, 150.0),
            natural: (1, 2),
            rotation: Rotation::CounterClockwise,
            sizing: SizingMode::Cover,
            expect: (150.0, 4.0 / 3.0, 4.0 / 3.0),
        },
        Case {
            note: "contain portrait x#3 y#3; ties: square last, first == 1/img",
            first: (20.0, 10.0),
            last: (100.0, 100.0),
            natural: (1, 2),
            rotation: Rotation::Clockwise,
            sizing: SizingMode::Contain,
            expect: (25.0, 2.0, 1.0),
        },
        Case {
            note: "contain portrait x#3 y#3; ties: last == first",
            first: (10.0, 20.0),
            last: (100.0, 200.0),
            natural: (1, 2),
            rotation: Rotation::CounterClockwise,
            sizing: SizingMode::Contain,
            expect: (50.0, 4.0, 4.0),
        },
        Case {
            note: "upright x#3",
            first: (10.0, 20.0),
            last: (100.0, 100.0),
            natural: (2, 1),
            rotation: Rotation::Upright,
            sizing: SizingMode::Contain,
            expect: (100.0, 4.0, 2.0),
        },
        Case {
            note: "cover portrait x#1 y#3; ties: img == h-ratio",
            first: (20.0, 10.0),
            last: (100.0, 150.0),
            natural: (1, 1),
            rotation: Rotation::CounterClockwise,
            sizing: SizingMode::Cover,
            expect: (150.0, 2.0, 1.0),
        },
        Case {
            note: "cover landscape x#2 y#2; ties: square last",
            first: (10.0, 20.0),
            last: (100.0, 100.0),
            natural: (3, 2),
            rotation: Rotation::Clockwise,
            sizing: SizingMode::Cover,
            expect: (225.0, 4.0 / 9.0, 8.0 / 9.0),
        },
        Case {
            note: "cover portrait x#6 y#9",
            first: (10.0, 20.0),
            last: (100.0, 150.0),
            natural: (2, 1),
            rotation: Rotation::CounterClockwise,
            sizing: SizingMode::Cover,
            expect: (200.0, 3.0 / 4.0, 1.0),
        },
        Case {
            note: "cover landscape x#3 y#3",
            first: (10.0, 20.0),
            last: (150.0, 100.0),
            natural: (2, 1),
            rotation: Rotation::Clockwise,
            sizing: SizingMode::Cover,
            expect: (400.0, 1.0 / 4.0, 3.0 / 4.0),
        },
        Case {
            note: "contain portrait x#1 y#1",
            first: (20.0, 10.0),
            last: (100.0, 150.0),
            natural: (2, 1),
            rotation: Rotation::CounterClockwise,
            sizing: SizingMode::Contain,
            expect: (150.0, 4.0, 4.0 / 3.0),
        },
        Case {
            note: "contain landscape x#1 y#1",
            first: (20.0, 10.0),
            last: (150.0, 100.0),
            natural: (2, 1),
            rotation: Rotation::Clockwise,
            sizing: SizingMode::Contain,
            expect: (100.0, 4.0, 3.0),
        },
        Case {
            note: "contain landscape x#2 y#2",
            first: (20.0, 10.0),
            last: (150.0, 100.0),
            natural: (1, 2),
            rotation: Rotation::CounterClockwise,
            sizing: SizingMode::Contain,
            expect: (100.0, 1.0, 3.0 / 4.0),
        },
        Case {
            note: "cover landscape x#6 y#5; ties: img == 1/first",
            first: (10.0, 20.0),
            last: (200.0, 100.0),
            natural: (2, 1),
            rotation: Rotation::Clockwise,
            sizing: SizingMode::Cover,
            expect: (400.0, 1.0 / 4.0, 1.0),
        },
        Case {
            note: "cover portrait x#5 y#1",
            first: (30.0, 10.0),
            last: (100.0, 150.0),
            natural: (2, 1),
            rotation: Rotation::CounterClockwise,
            sizing: SizingMode::Cover,
            expect: (200.0, 9.0 / 2.0, 1.0),
        },
        Case {
            note: "contain portrait x#4 y#4; ties: h-ratio == img",
            first: (10.0, 20.0),
            last: (100.0, 150.0),
            natural: (3, 2),
            rotation: Rotation::Clockwise,
            sizing: SizingMode::Contain,
            expect: (150.0, 1.0, 4.0 / 3.0),
        },
        Case {
            note: "cover portrait x#1 y#2",
            first: (20.0, 10.0),
            last: (100.0, 150.0),
            natural: (4, 3),
            rotation: Rotation::CounterClockwise,
            sizing: SizingMode::Cover,
            expect: (150.0, 8.0 / 3.0, 8.0 / 9.0),
        },
        Case {
            note: "cover portrait x#4 y#8",
            first: (10.0, 30.0),
            last: (150.0, 200.0),
            natural: (2, 1),
            rotation: Rotation::Clockwise,
            sizing: SizingMode::Cover,
            expect: (300.0, 2.0 / 3.0, 3.0 / 2.0),
        },
        Case {
            note: "cover portrait x#2 y#5",
            first: (20.0, 10.0),
            last: (100.0, 300.0),
            natural: (2, 1),
            rotation: Rotation::CounterClockwise,
            sizing: SizingMode::Cover,
            expect: (300.0, 4.0, 2.0 / 3.0),
        },
        Case {
            note: "cover landscape x#4 y#4",
            first: (20.0, 10.0),
            last: (300.0, 100.0),
            natural: (2, 1),
            rotation: Rotation::Clockwise,
            sizing: SizingMode::Cover,
            expect: (600.0, 2.0 / 3.0, 1.0),
        },
        Case {
            note: "cover landscape x#1 y#1",
            first: (30.0, 10.0),
            last: (200.0, 150.0),
            natural: (2, 1),
            rotation: Rotation::CounterClockwise,
            sizing: SizingMode::Cover,
            expect: (600.0, 3.0 / 2.0, 2.0 / 3.0),
        },
        Case {
            note: "cover portrait x#3 y#7; ties: first == h-ratio, first == img",
            first: (10.0, 10.0),
            last: (100.0, 150.0),
            natural: (1, 1),
            rotation: Rotation::Clockwise,
            sizing: SizingMode::Cover,
            expect: (150.0, 1.0, 2.0 / 3.0),
        },
        Case {
            note: "upright x#1",
            first: (10.0, 10.0),
            last: (100.0, 150.0),
            natural: (1, 2),
            rotation: Rotation::Half,
            sizing: SizingMode::Contain,
            expect: (75.0, 4.0 / 3.0, 2.0),
        },
        Case {
            note: "upright x#2",
            first: (10.0, 20.0),
            last: (100.0, 150.0),
            natural: (1, 1),
            rotation: Rotation::Upright,
            sizing: SizingMode::Cover,
            expect: (150.0, 4.0 / 3.0, 1.0),
        },
        Case {
            note: "contain portrait x#2 y#3; ties: square last",
            first: (10.0, 20.0),
            last: (100.0, 100.0),
            natural: (2, 3),
            rotation: Rotation::CounterClockwise,
            sizing: SizingMode::Contain,
            expect: (400.0 / 9.0, 2.0 / 3.0, 3.0),
        },
        Case {
            note: "contain portrait x#1 y#2",
            first: (30.0, 10.0),
            last: (100.0, 150.0),
            natural: (1, 2),
            rotation: Rotation::Clockwise,
            sizing: SizingMode::Contain,
            expect: (75.0 / 2.0, 6.0, 4.0 / 3.0),
        },
        Case {
            note: "cover landscape x#5 y#5; f64: first == 1/img, 1/first < img",
            first: (5.0, 9.0),
            last: (80.0, 40.0),
            natural: (9, 5),
            rotation: Rotation::CounterClockwise,
            sizing: SizingMode::Cover,
            expect: (144.0, 0.45, 1.0),
        },
    ]
}

#[test]
fn every_branch_matches_reference_values() {
    for case in branch_cases() {
        let r = correct(
            &bx(case.first.0, case.first.1),
            &bx(case.last.0, case.last.1),
            &NaturalSize::new(case.natural.0, case.natural.1),
            case.rotation,
            case.sizing,
        );
        let (w, x, y) = case.expect;
        assert!(
            (r.w - w).abs() < EPS && (r.x - x).abs() < EPS && (r.y - y).abs() < EPS,
            "{}: got {r:?}, expected ({w}, {x}, {y})",
            case.note
        );
    }
}
