// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Implement [`Host`] for a plain display list and follow the camera from a
//! listener.
//!
//! The host is a `Vec` of tile ids in draw order plus a table of tiles. The
//! listener plays the part of a minimap that redraws its frustum outline
//! whenever the camera changes.
//!
//! Run:
//! - `cargo run -p vantage_demos --example custom_host`

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use kurbo::{Affine, Rect};
use vantage_viewport::{CameraState, Host, RefreshStrategy, Viewport, ViewportConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
enum ListError {
    #[error("tile {0} does not exist")]
    UnknownTile(u32),
    #[error("tile {0} is not in the display list")]
    NotListed(u32),
    #[error("index {index} out of bounds for {len} tiles")]
    OutOfBounds { index: usize, len: usize },
}

#[derive(Clone, Debug)]
struct Tile {
    rect: Rect,
    visible: bool,
}

#[derive(Debug, Default)]
struct DisplayList {
    tiles: Vec<Tile>,
    order: Vec<u32>,
    transform: Affine,
    clip: Rect,
}

impl DisplayList {
    fn tile(&mut self, rect: Rect) -> u32 {
        self.tiles.push(Tile {
            rect,
            visible: true,
        });
        (self.tiles.len() - 1) as u32
    }

    fn check(&self, id: u32) -> Result<(), ListError> {
        if (id as usize) < self.tiles.len() {
            Ok(())
        } else {
            Err(ListError::UnknownTile(id))
        }
    }

    fn bound(&self, index: usize, len: usize) -> Result<(), ListError> {
        if index <= len {
            Ok(())
        } else {
            Err(ListError::OutOfBounds { index, len })
        }
    }

    fn drawn(&self) -> usize {
        self.order
            .iter()
            .filter(|&&id| self.tiles[id as usize].visible)
            .count()
    }
}

impl Host for DisplayList {
    type Object = u32;
    type Error = ListError;

    fn add(&mut self, obj: u32) -> Result<(), ListError> {
        self.check(obj)?;
        self.order.retain(|&o| o != obj);
        self.order.push(obj);
        Ok(())
    }

    fn add_at(&mut self, obj: u32, index: usize) -> Result<(), ListError> {
        self.check(obj)?;
        let len = self.order.len() - usize::from(self.order.contains(&obj));
        self.bound(index, len)?;
        self.order.retain(|&o| o != obj);
        self.order.insert(index, obj);
        Ok(())
    }

    fn remove(&mut self, obj: u32) -> Result<(), ListError> {
        let index = self.index_of(obj)?;
        self.order.remove(index);
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<u32, ListError> {
        let len = self.order.len();
        if index >= len {
            return Err(ListError::OutOfBounds { index, len });
        }
        Ok(self.order.remove(index))
    }

    fn remove_range(&mut self, range: Range<usize>) -> Result<Vec<u32>, ListError> {
        let len = self.order.len();
        if range.start > range.end || range.end > len {
            return Err(ListError::OutOfBounds {
                index: range.end,
                len,
            });
        }
        Ok(self.order.drain(range).collect())
    }

    fn child_at(&self, index: usize) -> Result<u32, ListError> {
        self.order.get(index).copied().ok_or(ListError::OutOfBounds {
            index,
            len: self.order.len(),
        })
    }

    fn index_of(&self, obj: u32) -> Result<usize, ListError> {
        self.order
            .iter()
            .position(|&o| o == obj)
            .ok_or(ListError::NotListed(obj))
    }

    fn set_index(&mut self, obj: u32, index: usize) -> Result<(), ListError> {
        let from = self.index_of(obj)?;
        let len = self.order.len();
        if index >= len {
            return Err(ListError::OutOfBounds { index, len });
        }
        self.order.remove(from);
        self.order.insert(index, obj);
        Ok(())
    }

    fn swap(&mut self, a: u32, b: u32) -> Result<(), ListError> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        self.order.swap(ia, ib);
        Ok(())
    }

    fn children(&self) -> &[u32] {
        &self.order
    }

    fn content_bounds(&self, obj: u32) -> Result<Rect, ListError> {
        self.tiles
            .get(obj as usize)
            .map(|t| t.rect)
            .ok_or(ListError::UnknownTile(obj))
    }

    fn set_visible(&mut self, obj: u32, visible: bool) {
        if let Some(tile) = self.tiles.get_mut(obj as usize) {
            tile.visible = visible;
        }
    }

    fn set_content_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn set_clip(&mut self, clip: Rect) {
        self.clip = clip;
    }
}

fn main() -> Result<(), vantage_viewport::ViewportError<ListError>> {
    tracing_subscriber::fmt::init();

    let mut list = DisplayList::default();
    let mut ids = Vec::new();
    for i in 0..100 {
        let x = f64::from(i % 10) * 100.0;
        let y = f64::from(i / 10) * 100.0;
        ids.push(list.tile(Rect::new(x, y, x + 80.0, y + 80.0)));
    }

    let config = ViewportConfig::new(250.0, 250.0).with_strategy(RefreshStrategy::Diff);
    let mut viewport = Viewport::new(list, config)?;
    for &id in &ids {
        viewport.add_child(id)?;
    }

    let minimap: Rc<RefCell<Vec<Rect>>> = Rc::default();
    let outline = Rc::clone(&minimap);
    let listener = viewport
        .camera_mut()
        .subscribe(move |state: &CameraState| outline.borrow_mut().push(state.frustum.rect()));

    for step in 0..4 {
        let offset = f64::from(step) * 200.0;
        viewport.camera_mut().set_position((offset, offset / 2.0));
        viewport.refresh();
        println!(
            "step {step}: {} of {} tiles drawn, content transform {:?}",
            viewport.host().drawn(),
            viewport.host().len(),
            viewport.host().transform.as_coeffs(),
        );
    }

    viewport.resize(400.0, 250.0);
    println!("resized, clip now {:?}", viewport.host().clip);

    // Drop a row from the list; the index forgets those tiles too.
    let removed = viewport.remove_children(0..10)?;
    println!(
        "removed {} tiles, {} still indexed",
        removed.len(),
        viewport.indexed_len()
    );

    viewport.camera_mut().unsubscribe(listener);
    viewport.camera_mut().set_position((0.0, 0.0));
    for (i, rect) in minimap.borrow().iter().enumerate() {
        println!("minimap frame {i}: {rect:?}");
    }
    Ok(())
}
