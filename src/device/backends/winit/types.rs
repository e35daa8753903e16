//! Host-to-engine translation tables for the winit backend.

use winit::event::MouseButton as HostMouseButton;
use winit::event::TouchPhase as HostTouchPhase;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::scancode::PhysicalKeyExtScancode;
use winit::window::CursorIcon;

use crate::device::cursor::CursorStyle;
use crate::device::events::{MouseButton, TouchPhase};
use crate::device::keymap::{Key, KeyMap};

/// The curated host key list. Each entry pairs a host key with its engine
/// key code; the native scancodes behind the host keys are resolved once
/// at device startup when the key map is built.
#[rustfmt::skip]
const HOST_KEY_PAIRS: &[(KeyCode, Key)] = &[
    (KeyCode::Backspace, Key::Back),
    (KeyCode::Tab, Key::Tab),
    (KeyCode::Enter, Key::Return),

    (KeyCode::Pause, Key::Pause),
    (KeyCode::CapsLock, Key::Capital),

    (KeyCode::Escape, Key::Escape),
    (KeyCode::Space, Key::Space),
    (KeyCode::PageUp, Key::PageUp),
    (KeyCode::PageDown, Key::PageDown),
    (KeyCode::End, Key::End),
    (KeyCode::Home, Key::Home),
    (KeyCode::ArrowLeft, Key::Left),
    (KeyCode::ArrowUp, Key::Up),
    (KeyCode::ArrowRight, Key::Right),
    (KeyCode::ArrowDown, Key::Down),

    (KeyCode::PrintScreen, Key::Snapshot),

    (KeyCode::Insert, Key::Insert),
    (KeyCode::Delete, Key::Delete),
    (KeyCode::Help, Key::Help),

    (KeyCode::Digit0, Key::Key0),
    (KeyCode::Digit1, Key::Key1),
    (KeyCode::Digit2, Key::Key2),
    (KeyCode::Digit3, Key::Key3),
    (KeyCode::Digit4, Key::Key4),
    (KeyCode::Digit5, Key::Key5),
    (KeyCode::Digit6, Key::Key6),
    (KeyCode::Digit7, Key::Key7),
    (KeyCode::Digit8, Key::Key8),
    (KeyCode::Digit9, Key::Key9),

    (KeyCode::KeyA, Key::A),
    (KeyCode::KeyB, Key::B),
    (KeyCode::KeyC, Key::C),
    (KeyCode::KeyD, Key::D),
    (KeyCode::KeyE, Key::E),
    (KeyCode::KeyF, Key::F),
    (KeyCode::KeyG, Key::G),
    (KeyCode::KeyH, Key::H),
    (KeyCode::KeyI, Key::I),
    (KeyCode::KeyJ, Key::J),
    (KeyCode::KeyK, Key::K),
    (KeyCode::KeyL, Key::L),
    (KeyCode::KeyM, Key::M),
    (KeyCode::KeyN, Key::N),
    (KeyCode::KeyO, Key::O),
    (KeyCode::KeyP, Key::P),
    (KeyCode::KeyQ, Key::Q),
    (KeyCode::KeyR, Key::R),
    (KeyCode::KeyS, Key::S),
    (KeyCode::KeyT, Key::T),
    (KeyCode::KeyU, Key::U),
    (KeyCode::KeyV, Key::V),
    (KeyCode::KeyW, Key::W),
    (KeyCode::KeyX, Key::X),
    (KeyCode::KeyY, Key::Y),
    (KeyCode::KeyZ, Key::Z),

    (KeyCode::SuperLeft, Key::LWin),
    (KeyCode::SuperRight, Key::RWin),

    (KeyCode::Numpad0, Key::Numpad0),
    (KeyCode::Numpad1, Key::Numpad1),
    (KeyCode::Numpad2, Key::Numpad2),
    (KeyCode::Numpad3, Key::Numpad3),
    (KeyCode::Numpad4, Key::Numpad4),
    (KeyCode::Numpad5, Key::Numpad5),
    (KeyCode::Numpad6, Key::Numpad6),
    (KeyCode::Numpad7, Key::Numpad7),
    (KeyCode::Numpad8, Key::Numpad8),
    (KeyCode::Numpad9, Key::Numpad9),
    (KeyCode::NumpadMultiply, Key::Multiply),
    (KeyCode::NumpadAdd, Key::Add),
    (KeyCode::NumpadSubtract, Key::Subtract),
    (KeyCode::NumpadDecimal, Key::Decimal),
    (KeyCode::NumpadDivide, Key::Divide),
    (KeyCode::NumpadEnter, Key::NumpadEnter),

    (KeyCode::F1, Key::F1),
    (KeyCode::F2, Key::F2),
    (KeyCode::F3, Key::F3),
    (KeyCode::F4, Key::F4),
    (KeyCode::F5, Key::F5),
    (KeyCode::F6, Key::F6),
    (KeyCode::F7, Key::F7),
    (KeyCode::F8, Key::F8),
    (KeyCode::F9, Key::F9),
    (KeyCode::F10, Key::F10),
    (KeyCode::F11, Key::F11),
    (KeyCode::F12, Key::F12),
    (KeyCode::F13, Key::F13),
    (KeyCode::F14, Key::F14),
    (KeyCode::F15, Key::F15),

    (KeyCode::NumLock, Key::Numlock),
    (KeyCode::ScrollLock, Key::Scroll),
    (KeyCode::ShiftLeft, Key::LShift),
    (KeyCode::ShiftRight, Key::RShift),
    (KeyCode::ControlLeft, Key::LControl),
    (KeyCode::ControlRight, Key::RControl),
    (KeyCode::AltLeft, Key::LAlt),
    (KeyCode::AltRight, Key::RAlt),

    (KeyCode::Semicolon, Key::Semicolon),
    (KeyCode::Equal, Key::Equals),
    (KeyCode::Comma, Key::Comma),
    (KeyCode::Minus, Key::Minus),
    (KeyCode::Period, Key::Period),
    (KeyCode::Slash, Key::Slash),
    (KeyCode::Backquote, Key::Grave),
    (KeyCode::BracketLeft, Key::LBracket),
    (KeyCode::Backslash, Key::Backslash),
    (KeyCode::BracketRight, Key::RBracket),

    // some special keys missing
];

/// Builds the device key map from the curated list. Host keys the platform
/// reports no scancode for are left out; identical native input resolves
/// identically for the lifetime of the device.
pub fn build_keymap() -> KeyMap {
    let pairs = HOST_KEY_PAIRS.iter().filter_map(|&(code, key)| {
        PhysicalKey::Code(code)
            .to_scancode()
            .map(|native| (native, key))
    });

    KeyMap::new(pairs)
}

pub fn from_mouse_button(button: HostMouseButton) -> MouseButton {
    match button {
        HostMouseButton::Left => MouseButton::Left,
        HostMouseButton::Right => MouseButton::Right,
        HostMouseButton::Middle => MouseButton::Middle,
        HostMouseButton::Back => MouseButton::Extra1,
        HostMouseButton::Forward => MouseButton::Extra2,
        HostMouseButton::Other(id) => MouseButton::Other(id),
    }
}

pub fn from_touch_phase(phase: HostTouchPhase) -> TouchPhase {
    match phase {
        HostTouchPhase::Started => TouchPhase::Began,
        HostTouchPhase::Moved => TouchPhase::Moved,
        HostTouchPhase::Ended => TouchPhase::Ended,
        HostTouchPhase::Cancelled => TouchPhase::Cancelled,
    }
}

pub fn named_cursor_icon(style: CursorStyle) -> CursorIcon {
    match style {
        CursorStyle::Normal => CursorIcon::Default,
        CursorStyle::Cross => CursorIcon::Crosshair,
        CursorStyle::Hand => CursorIcon::Pointer,
        CursorStyle::Help => CursorIcon::Help,
        CursorStyle::IBeam => CursorIcon::Text,
        CursorStyle::No => CursorIcon::NotAllowed,
        CursorStyle::Wait => CursorIcon::Wait,
        CursorStyle::SizeAll => CursorIcon::Move,
        CursorStyle::SizeNesw => CursorIcon::NeswResize,
        CursorStyle::SizeNwse => CursorIcon::NwseResize,
        CursorStyle::SizeNs => CursorIcon::NsResize,
        CursorStyle::SizeWe => CursorIcon::EwResize,
        // No north-pointing arrow in the host set.
        CursorStyle::Up => CursorIcon::NResize,
    }
}
