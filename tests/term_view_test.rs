mod common;

use common::shared_atlas;
use lunar_oasis::core::{blend, LevelDesc, Shading, Simulation};
use lunar_oasis::engine::{Game, LevelSource};
use lunar_oasis::term::{encode_diff_into, encode_full_into, CellBuffer, PixelView, Rgb, Viewport, HALF_BLOCK};
use lunar_oasis::types::{Rgba, LEVEL_GRID};

fn open_game() -> Game {
    let rows = vec!["0".repeat(LEVEL_GRID); LEVEL_GRID];
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let desc = LevelDesc::from_rows(&rows, (32, 10)).unwrap();
    let sim = Simulation::new(shared_atlas(), Shading::Lambert, 1);
    Game::new(sim, LevelSource::Fixed(desc))
}

#[test]
fn term_view_shows_the_ship_mid_screen() {
    let mut game = open_game();
    game.render();

    let mut out = CellBuffer::new(0, 0);
    PixelView::new().render_into(game.sim().fb(), "LV 1", Viewport::new(64, 33), &mut out);

    // Ship sprite is 4×9 centred on the camera: pixels (30..=33, 28..=36).
    let ship = Rgb::from(blend(Rgba::BLACK, Rgba::new(180, 180, 200, 255)));
    let cell = out.get(31, 14).unwrap();
    assert_eq!(cell.ch, HALF_BLOCK);
    assert_eq!(cell.style.fg, ship);
    assert_eq!(cell.style.bg, ship);

    assert_eq!(out.get(0, 32).map(|c| c.ch), Some('L'));
}

#[test]
fn term_view_centres_upscaled_image() {
    let mut game = open_game();
    game.render();

    let mut out = CellBuffer::new(0, 0);
    let vp = Viewport::new(150, 70);
    PixelView::new().render_into(game.sim().fb(), "", vp, &mut out);
    assert_eq!((out.width(), out.height()), (150, 70));

    // Scale 2: 128 columns centred in 150 leaves 11 on the left.
    let layout = PixelView::new().layout(vp);
    assert_eq!((layout.scale, layout.origin_x), (2, 11));
    assert_eq!(out.get(10, 0).map(|c| c.ch), Some(' '));
    assert_eq!(out.get(11, 0).map(|c| c.ch), Some(HALF_BLOCK));
}

#[test]
fn term_view_encodes_frames_and_diffs() {
    let mut game = open_game();
    game.render();
    let view = PixelView::new();
    let vp = Viewport::new(64, 33);

    let mut first = CellBuffer::new(0, 0);
    view.render_into(game.sim().fb(), "", vp, &mut first);
    let mut bytes = Vec::new();
    encode_full_into(&first, &mut bytes).unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains(HALF_BLOCK));

    // An unchanged frame encodes no glyphs.
    let mut diff = Vec::new();
    encode_diff_into(&first, &first.clone(), &mut diff).unwrap();
    assert!(!String::from_utf8_lossy(&diff).contains(HALF_BLOCK));

    // After the ship falls for a while, something changes.
    for _ in 0..30 {
        game.frame(&[]);
    }
    let mut second = CellBuffer::new(0, 0);
    view.render_into(game.sim().fb(), "", vp, &mut second);
    diff.clear();
    encode_diff_into(&first, &second, &mut diff).unwrap();
    assert!(String::from_utf8_lossy(&diff).contains(HALF_BLOCK));
}
