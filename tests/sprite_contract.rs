use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::collections::HashSet;

use petdash::pet::sprite::{
    palette, render, render_base64, render_pixels, SPRITE_BYTES, SPRITE_HEIGHT, SPRITE_WIDTH,
};
use petdash::pet::VisualState;
use petdash::service::GameResponse;

mod common;

#[test]
fn every_state_is_exactly_80_by_80_by_2() {
    assert_eq!(SPRITE_BYTES, 12_800);
    for state in VisualState::ALL {
        assert_eq!(render(state).len(), SPRITE_WIDTH * SPRITE_HEIGHT * 2);
    }
}

#[test]
fn bytes_decode_back_to_pixels_low_byte_first() {
    for state in VisualState::ALL {
        let decoded: Vec<u16> = render(state)
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        assert_eq!(decoded, render_pixels(state), "{}", state);
    }
}

#[test]
fn each_state_has_its_own_image() {
    let distinct: HashSet<Vec<u8>> = VisualState::ALL.iter().map(|s| render(*s)).collect();
    assert_eq!(distinct.len(), VisualState::ALL.len());
}

#[test]
fn body_color_dominates_the_image() {
    for state in VisualState::ALL {
        let body = palette(state).body;
        let count = render_pixels(state).iter().filter(|px| **px == body).count();
        assert!(count > 1_000, "{} has only {} body pixels", state, count);
    }
}

#[test]
fn response_image_is_the_sprite_of_its_state() {
    let mut pet = common::fresh_pet();
    pet.hunger = 10;
    let resp = GameResponse::build(pet, None);
    assert_eq!(resp.state, VisualState::Hungry);
    assert!(resp.needs_attention);
    assert_eq!(resp.image, render_base64(VisualState::Hungry));
    assert_eq!(STANDARD.decode(&resp.image).unwrap(), render(VisualState::Hungry));
}
