//! The cursor controller.
//!
//! The controller owns a set of cursor icons: the fixed built-in shapes
//! created from host named cursors at construction, plus any number of
//! custom icons converted from pixel sprites. An icon is *idle* when it has
//! no frames (activation is a no-op), *static* with one frame, and
//! *animated* with two or more frames and a nonzero frame duration; the run
//! loop drives animated icons through `animate` once per tick.
//!
//! Host cursor resources derive from the window context, so the device
//! releases them through `clear` strictly before the context is destroyed.

use std::time::Duration;

use smallvec::SmallVec;

use crate::errors::Result;
use crate::math::prelude::{Rect, Vector2};
use crate::video::image::Image;

use super::backends::{CursorHandle, CursorImage, Visitor};
use super::time::Timestamp;

/// The built-in cursor shapes every device starts with. Their icon ids are
/// fixed and ordered as listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorStyle {
    Normal,
    Cross,
    Hand,
    Help,
    IBeam,
    No,
    Wait,
    SizeAll,
    SizeNesw,
    SizeNwse,
    SizeNs,
    SizeWe,
    Up,
}

impl CursorStyle {
    pub const ALL: [CursorStyle; 13] = [
        CursorStyle::Normal,
        CursorStyle::Cross,
        CursorStyle::Hand,
        CursorStyle::Help,
        CursorStyle::IBeam,
        CursorStyle::No,
        CursorStyle::Wait,
        CursorStyle::SizeAll,
        CursorStyle::SizeNesw,
        CursorStyle::SizeNwse,
        CursorStyle::SizeNs,
        CursorStyle::SizeWe,
        CursorStyle::Up,
    ];
}

/// Identifies one icon held by the cursor controller. Built-in styles map
/// onto the leading ids; `add_icon` hands out the ids after them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorIconId(pub usize);

impl From<CursorStyle> for CursorIconId {
    fn from(style: CursorStyle) -> Self {
        match CursorStyle::ALL.iter().position(|&v| v == style) {
            Some(index) => CursorIconId(index),
            None => CursorIconId(0),
        }
    }
}

/// One animation frame of a sprite: a texture in the bank plus the source
/// rectangle to cut out of it.
#[derive(Debug, Clone, Copy)]
pub struct CursorSpriteFrame {
    pub texture: usize,
    pub rect: usize,
}

struct CursorSpriteDef {
    frames: Vec<CursorSpriteFrame>,
    frame_time: Duration,
}

/// An indexed bank of cursor sprites: textures, source rectangles and the
/// sprites referencing them. Treated as read-only input by the controller.
#[derive(Default)]
pub struct CursorSpriteBank {
    textures: Vec<Image>,
    rects: Vec<Rect>,
    sprites: Vec<CursorSpriteDef>,
}

impl CursorSpriteBank {
    pub fn new() -> Self {
        CursorSpriteBank::default()
    }

    pub fn add_texture(&mut self, texture: Image) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    pub fn add_rect(&mut self, rect: Rect) -> usize {
        self.rects.push(rect);
        self.rects.len() - 1
    }

    pub fn add_sprite(&mut self, frames: Vec<CursorSpriteFrame>, frame_time: Duration) -> usize {
        self.sprites.push(CursorSpriteDef { frames, frame_time });
        self.sprites.len() - 1
    }

    /// Cuts one sprite frame out of its texture and converts it to the
    /// RGBA image the host cursor path consumes.
    fn frame_image(&self, frame: CursorSpriteFrame, hotspot: Vector2<u32>) -> Result<CursorImage> {
        let texture = self
            .textures
            .get(frame.texture)
            .ok_or_else(|| format_err!("no texture {} in the sprite bank", frame.texture))?;
        let rect = self
            .rects
            .get(frame.rect)
            .copied()
            .ok_or_else(|| format_err!("no rectangle {} in the sprite bank", frame.rect))?;

        let dimensions = texture.dimensions();
        let width = rect.width();
        let height = rect.height();
        if width <= 0
            || height <= 0
            || rect.min.x < 0
            || rect.min.y < 0
            || rect.max.x as u32 > dimensions.x
            || rect.max.y as u32 > dimensions.y
        {
            bail!(
                "sprite rectangle {}x{}+{}+{} does not fit texture {}x{}",
                width,
                height,
                rect.min.x,
                rect.min.y,
                dimensions.x,
                dimensions.y
            );
        }

        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height as u32 {
            for x in 0..width as u32 {
                let pixel = texture.rgba(rect.min.x as u32 + x, rect.min.y as u32 + y);
                rgba.extend_from_slice(&pixel);
            }
        }

        Ok(CursorImage {
            rgba,
            width: width as u32,
            height: height as u32,
            hotspot: Vector2::new(
                hotspot.x.min(width as u32 - 1),
                hotspot.y.min(height as u32 - 1),
            ),
        })
    }
}

/// A sprite reference handed to `add_icon`/`change_icon`.
pub struct CursorSprite<'a> {
    pub bank: &'a CursorSpriteBank,
    pub sprite: usize,
    /// The click position inside each frame.
    pub hotspot: Vector2<u32>,
}

struct CursorIcon {
    frames: SmallVec<[CursorHandle; 2]>,
    frame_time: Duration,
}

pub struct CursorControl {
    icons: Vec<CursorIcon>,
    active: CursorIconId,
    active_since: Timestamp,
    last_frame: usize,
    reference_rect: Option<Rect>,
    visible: bool,
}

impl CursorControl {
    /// Builds the controller with the built-in icon set. Only called once a
    /// rendering context (or the headless stand-in) exists.
    pub(crate) fn new(visitor: &mut dyn Visitor) -> Self {
        let mut icons = Vec::with_capacity(CursorStyle::ALL.len());
        for style in CursorStyle::ALL {
            let handle = visitor.named_cursor(style);
            icons.push(CursorIcon {
                frames: SmallVec::from_elem(handle, 1),
                frame_time: Duration::ZERO,
            });
        }

        visitor.set_cursor_visible(true);

        CursorControl {
            icons,
            active: CursorIconId::from(CursorStyle::Normal),
            active_since: Timestamp::from_millis(0),
            last_frame: 0,
            reference_rect: None,
            visible: true,
        }
    }

    /// Activates an icon. Unknown ids and idle icons are a no-op; a static
    /// icon sets the host cursor once; an animated icon starts its
    /// time-driven cycle at frame zero.
    pub fn set_active(&mut self, visitor: &mut dyn Visitor, id: CursorIconId, now: Timestamp) {
        let icon = match self.icons.get(id.0) {
            Some(icon) => icon,
            None => return,
        };
        let first = match icon.frames.first() {
            Some(first) => first,
            None => return,
        };

        visitor.set_cursor(first);
        self.active = id;
        self.active_since = now;
        self.last_frame = 0;
    }

    #[inline]
    pub fn active(&self) -> CursorIconId {
        self.active
    }

    /// Advances the active icon's animation. Invoked once per run-loop
    /// tick; the host cursor is only touched when the computed frame
    /// differs from the one already shown, so redundant calls within the
    /// same tick are free.
    pub fn animate(&mut self, visitor: &mut dyn Visitor, now: Timestamp) {
        let icon = match self.icons.get(self.active.0) {
            Some(icon) => icon,
            None => return,
        };

        let frame_millis = icon.frame_time.as_millis() as u64;
        if icon.frames.len() < 2 || frame_millis == 0 {
            return;
        }

        let elapsed = now.millis() - self.active_since.millis();
        let frame = (elapsed / frame_millis) as usize % icon.frames.len();
        if frame != self.last_frame {
            visitor.set_cursor(&icon.frames[frame]);
            self.last_frame = frame;
        }
    }

    /// Converts a sprite into host cursor resources and registers it as a
    /// new icon.
    pub fn add_icon(
        &mut self,
        visitor: &mut dyn Visitor,
        sprite: &CursorSprite,
    ) -> Result<CursorIconId> {
        let icon = Self::build_icon(visitor, sprite)?;
        self.icons.push(icon);
        Ok(CursorIconId(self.icons.len() - 1))
    }

    /// Replaces the resources behind an existing icon id. The previous
    /// resources are released, not leaked; an unknown id is a logged no-op.
    pub fn change_icon(
        &mut self,
        visitor: &mut dyn Visitor,
        id: CursorIconId,
        sprite: &CursorSprite,
    ) -> Result<()> {
        if id.0 >= self.icons.len() {
            warn!("change_icon with unknown cursor icon {}", id.0);
            return Ok(());
        }

        let icon = Self::build_icon(visitor, sprite)?;
        let old = ::std::mem::replace(&mut self.icons[id.0], icon);
        for handle in old.frames {
            visitor.delete_cursor(handle);
        }

        if self.active == id {
            self.last_frame = 0;
        }
        Ok(())
    }

    fn build_icon(visitor: &mut dyn Visitor, sprite: &CursorSprite) -> Result<CursorIcon> {
        let def = sprite
            .bank
            .sprites
            .get(sprite.sprite)
            .ok_or_else(|| format_err!("no sprite {} in the sprite bank", sprite.sprite))?;

        let mut frames = SmallVec::new();
        for frame in &def.frames {
            let image = match sprite.bank.frame_image(*frame, sprite.hotspot) {
                Ok(image) => image,
                Err(err) => {
                    Self::release_frames(visitor, frames);
                    return Err(err);
                }
            };
            match visitor.create_cursor(image) {
                Ok(handle) => frames.push(handle),
                Err(err) => {
                    Self::release_frames(visitor, frames);
                    return Err(err);
                }
            }
        }

        Ok(CursorIcon {
            frames,
            frame_time: def.frame_time,
        })
    }

    fn release_frames(visitor: &mut dyn Visitor, frames: SmallVec<[CursorHandle; 2]>) {
        for handle in frames {
            visitor.delete_cursor(handle);
        }
    }

    /// The pointer position clamped into `[0, extent]` of the window.
    pub fn position(&self, visitor: &dyn Visitor) -> Vector2<i32> {
        let raw = visitor.cursor_position();
        let extent = visitor.dimensions();
        Vector2::new(
            raw.x.max(0).min(extent.x as i32),
            raw.y.max(0).min(extent.y as i32),
        )
    }

    /// The pointer position normalized against the reference rectangle if
    /// one is set, the full window extent otherwise.
    pub fn relative_position(&self, visitor: &dyn Visitor) -> Vector2<f32> {
        let position = self.position(visitor);
        match self.reference_rect {
            Some(rect) => Vector2::new(
                position.x as f32 / rect.width() as f32,
                position.y as f32 / rect.height() as f32,
            ),
            None => {
                let extent = visitor.dimensions();
                Vector2::new(
                    position.x as f32 / extent.x as f32,
                    position.y as f32 / extent.y as f32,
                )
            }
        }
    }

    /// Warps the pointer. With a reference rectangle set, `position` is
    /// relative to the rectangle's origin.
    pub fn set_position(&mut self, visitor: &mut dyn Visitor, position: Vector2<i32>) {
        match self.reference_rect {
            Some(rect) => visitor.set_cursor_position(Vector2::new(
                rect.min.x + position.x,
                rect.min.y + position.y,
            )),
            None => visitor.set_cursor_position(position),
        }
    }

    /// Installs or removes the reference rectangle. Zero or odd dimensions
    /// are widened by one pixel so relative positions always divide by an
    /// even, nonzero denominator.
    pub fn set_reference_rect(&mut self, rect: Option<Rect>) {
        self.reference_rect = rect.map(|mut rect| {
            if rect.height() == 0 || rect.height() % 2 != 0 {
                rect.max.y += 1;
            }
            if rect.width() == 0 || rect.width() % 2 != 0 {
                rect.max.x += 1;
            }
            rect
        });
    }

    #[inline]
    pub fn reference_rect(&self) -> Option<Rect> {
        self.reference_rect
    }

    pub fn set_visible(&mut self, visitor: &mut dyn Visitor, visible: bool) {
        visitor.set_cursor_visible(visible);
        self.visible = visible;
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Releases every host cursor resource. The owning device calls this
    /// exactly once during teardown, before the rendering context goes
    /// away.
    pub(crate) fn clear(&mut self, visitor: &mut dyn Visitor) {
        for icon in self.icons.drain(..) {
            for handle in icon.frames {
                visitor.delete_cursor(handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::backends::HeadlessVisitor;
    use super::*;
    use crate::math::prelude::Point2;
    use crate::video::image::Image;
    use crate::video::ColorFormat;

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    fn visitor() -> HeadlessVisitor {
        HeadlessVisitor::new(Vector2::new(800, 600))
    }

    fn three_frame_bank() -> CursorSpriteBank {
        let mut bank = CursorSpriteBank::new();
        let texture = bank.add_texture(
            Image::new(
                ColorFormat::A8R8G8B8,
                Vector2::new(24, 8),
                vec![0xFF; 24 * 8 * 4],
            )
            .expect("texture"),
        );

        let frames = (0..3)
            .map(|index| {
                let rect = bank.add_rect(Rect::with_dimensions(
                    Point2::new(index * 8, 0),
                    8,
                    8,
                ));
                CursorSpriteFrame { texture, rect }
            })
            .collect();
        bank.add_sprite(frames, Duration::from_millis(100));
        bank
    }

    #[test]
    fn animated_icon_steps_through_frames_by_elapsed_time() {
        let mut visitor = visitor();
        let mut cursor = CursorControl::new(&mut visitor);

        let bank = three_frame_bank();
        let sprite = CursorSprite {
            bank: &bank,
            sprite: 0,
            hotspot: Vector2::new(0, 0),
        };
        let id = cursor.add_icon(&mut visitor, &sprite).expect("icon");

        cursor.set_active(&mut visitor, id, ms(0));
        let sets_after_activation = visitor.cursor_sets().len();

        // At t=0 the activation frame (frame 0) is already shown.
        cursor.animate(&mut visitor, ms(0));
        assert_eq!(visitor.cursor_sets().len(), sets_after_activation);

        // (250 / 100) mod 3 == 2.
        cursor.animate(&mut visitor, ms(250));
        assert_eq!(visitor.cursor_sets().len(), sets_after_activation + 1);

        // Redundant call at the same timestamp is free.
        cursor.animate(&mut visitor, ms(250));
        assert_eq!(visitor.cursor_sets().len(), sets_after_activation + 1);

        // Wraps around: (300 / 100) mod 3 == 0.
        cursor.animate(&mut visitor, ms(300));
        assert_eq!(visitor.cursor_sets().len(), sets_after_activation + 2);
    }

    #[test]
    fn static_icons_never_animate() {
        let mut visitor = visitor();
        let mut cursor = CursorControl::new(&mut visitor);

        cursor.set_active(
            &mut visitor,
            CursorIconId::from(CursorStyle::Cross),
            ms(0),
        );
        let sets = visitor.cursor_sets().len();

        cursor.animate(&mut visitor, ms(10_000));
        assert_eq!(visitor.cursor_sets().len(), sets);
    }

    #[test]
    fn activating_an_unknown_icon_is_a_no_op() {
        let mut visitor = visitor();
        let mut cursor = CursorControl::new(&mut visitor);

        let before = cursor.active();
        cursor.set_active(&mut visitor, CursorIconId(9999), ms(0));
        assert_eq!(cursor.active(), before);
    }

    #[test]
    fn change_icon_releases_the_previous_resources() {
        let mut visitor = visitor();
        let mut cursor = CursorControl::new(&mut visitor);

        let bank = three_frame_bank();
        let sprite = CursorSprite {
            bank: &bank,
            sprite: 0,
            hotspot: Vector2::new(0, 0),
        };
        let id = cursor.add_icon(&mut visitor, &sprite).expect("icon");
        let live_before = visitor.live_cursors().len();

        cursor
            .change_icon(&mut visitor, id, &sprite)
            .expect("change icon");

        // Three new frames created, three old ones released.
        assert_eq!(visitor.live_cursors().len(), live_before);
    }

    #[test]
    fn clear_releases_everything_once() {
        let mut visitor = visitor();
        let mut cursor = CursorControl::new(&mut visitor);

        let bank = three_frame_bank();
        let sprite = CursorSprite {
            bank: &bank,
            sprite: 0,
            hotspot: Vector2::new(0, 0),
        };
        cursor.add_icon(&mut visitor, &sprite).expect("icon");
        assert!(!visitor.live_cursors().is_empty());

        cursor.clear(&mut visitor);
        assert!(visitor.live_cursors().is_empty());

        // A second clear has nothing left to release.
        cursor.clear(&mut visitor);
        assert!(visitor.live_cursors().is_empty());
    }

    #[test]
    fn positions_are_clamped_into_the_window_extent() {
        let mut visitor = visitor();
        let cursor = CursorControl::new(&mut visitor);

        visitor.set_raw_cursor_position(Vector2::new(-5, 601));
        assert_eq!(cursor.position(&visitor), Vector2::new(0, 600));

        visitor.set_raw_cursor_position(Vector2::new(801, -1));
        assert_eq!(cursor.position(&visitor), Vector2::new(800, 0));
    }

    #[test]
    fn even_reference_dimensions_are_kept_odd_ones_widened() {
        let mut visitor = visitor();
        let mut cursor = CursorControl::new(&mut visitor);

        cursor.set_reference_rect(Some(Rect::with_dimensions(Point2::new(0, 0), 10, 10)));
        let rect = cursor.reference_rect().expect("reference rect");
        assert_eq!(rect.width(), 10);
        assert_eq!(rect.height(), 10);

        cursor.set_reference_rect(Some(Rect::with_dimensions(Point2::new(0, 0), 11, 11)));
        let rect = cursor.reference_rect().expect("reference rect");
        assert_eq!(rect.width(), 12);
        assert_eq!(rect.height(), 12);

        // Zero extents grow to one pixel so relative math never divides
        // by zero.
        cursor.set_reference_rect(Some(Rect::with_dimensions(Point2::new(4, 4), 0, 0)));
        let rect = cursor.reference_rect().expect("reference rect");
        assert_eq!(rect.width(), 1);
        assert_eq!(rect.height(), 1);
    }

    #[test]
    fn relative_positions_normalize_against_rect_or_window() {
        let mut visitor = visitor();
        let mut cursor = CursorControl::new(&mut visitor);

        visitor.set_raw_cursor_position(Vector2::new(400, 300));
        assert_eq!(cursor.relative_position(&visitor), Vector2::new(0.5, 0.5));

        cursor.set_reference_rect(Some(Rect::with_dimensions(Point2::new(0, 0), 800, 150)));
        assert_eq!(cursor.relative_position(&visitor), Vector2::new(0.5, 2.0));
    }
}
