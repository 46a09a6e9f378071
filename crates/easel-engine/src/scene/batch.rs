use super::{DrawCmd, DrawList};
use crate::mesh::{PrimitiveMode, TextureHandle};
use crate::style::Style;

/// State a backend has to switch between mesh submissions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BatchKey {
    pub style: Style,
    pub mode: PrimitiveMode,
    pub texture: Option<TextureHandle>,
}

/// A run of adjacent commands a backend may submit together.
///
/// Mesh runs share one [`BatchKey`]; every other command forms a batch of
/// its own with `key == None`.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    pub key: Option<BatchKey>,
    pub commands: &'a [DrawCmd],
}

impl Batch<'_> {
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn key_of(cmd: &DrawCmd) -> Option<BatchKey> {
    match cmd {
        DrawCmd::DrawMesh(m) => Some(BatchKey {
            style: m.style,
            mode: m.mesh.mode(),
            texture: m.mesh.texture(),
        }),
        _ => None,
    }
}

/// Iterator over [`Batch`]es in recorded order.
pub struct Batches<'a> {
    rest: &'a [DrawCmd],
}

impl<'a> Iterator for Batches<'a> {
    type Item = Batch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.first()?;
        let key = key_of(first);
        let len = match key {
            None => 1,
            Some(k) => 1 + self.rest[1..].iter().take_while(|c| key_of(c) == Some(k)).count(),
        };
        let (commands, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(Batch { key, commands })
    }
}

impl DrawList {
    /// Groups adjacent mesh draws with identical style, primitive mode and
    /// texture. Order is never changed; concatenating the batches yields the
    /// command list.
    pub fn batches(&self) -> Batches<'_> {
        Batches { rest: self.commands() }
    }
}
