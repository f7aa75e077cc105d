use crate::drop::{resolve_drop, DropOptions};
use crate::error::{CoreError, Result};
use crate::geometry::{overlaps, Bounds, MIN_LAYER_WIDTH};
use crate::resize::resize;
use crate::split::split;
use crate::types::{Direction, Layer, LayerContent, Timeline, Track, TrackKind};

impl Timeline {
    pub fn new() -> Self {
        Self {
            tracks: vec![],
            layers: vec![],
        }
    }

    /// Add a track lane. Returns the new track's id.
    pub fn add_track(&mut self, kind: TrackKind) -> String {
        let track = Track::new(kind);
        let id = track.id.clone();
        self.tracks.push(track);
        id
    }

    /// Append a layer after the last layer on a track. On an empty track the
    /// layer starts at 0.
    pub fn add_layer(
        &mut self,
        track_id: &str,
        duration: f64,
        content: LayerContent,
    ) -> Result<String> {
        if !self.tracks.iter().any(|t| t.id == track_id) {
            return Err(CoreError::TrackNotFound(track_id.to_string()));
        }
        if duration < MIN_LAYER_WIDTH {
            return Err(CoreError::InvalidOperation(format!(
                "layer duration {duration} is below the minimum width {MIN_LAYER_WIDTH}"
            )));
        }

        let start = self
            .layers
            .iter()
            .filter(|l| l.track_id == track_id)
            .map(|l| l.end)
            .fold(0.0, f64::max);

        let layer = Layer::new(track_id, start, start + duration, content);
        let id = layer.id.clone();
        self.layers.push(layer);
        Ok(id)
    }

    /// Commit a one-sided resize, pushing or shrinking neighbors as the
    /// arrangement engine decides.
    pub fn resize_layer(
        &mut self,
        layer_id: &str,
        new_start: f64,
        new_end: f64,
        direction: Direction,
        bounds: Bounds,
    ) -> Result<()> {
        let target = self
            .layer(layer_id)
            .ok_or_else(|| CoreError::LayerNotFound(layer_id.to_string()))?
            .clone();
        self.layers = resize(&self.layers, &target, new_start, new_end, direction, bounds);
        Ok(())
    }

    /// Resolve a drop onto `track_id` and commit it, moving the layer across
    /// tracks when needed. Rejects placements the resolver could not untangle
    /// so the committed collection never overlaps.
    pub fn move_layer(
        &mut self,
        layer_id: &str,
        track_id: &str,
        raw_start: f64,
        bounds: Bounds,
        options: DropOptions,
    ) -> Result<()> {
        if !self.tracks.iter().any(|t| t.id == track_id) {
            return Err(CoreError::TrackNotFound(track_id.to_string()));
        }
        let dragged = self
            .layer(layer_id)
            .ok_or_else(|| CoreError::LayerNotFound(layer_id.to_string()))?
            .clone();

        let placement = resolve_drop(&self.layers, &dragged, track_id, raw_start, bounds, options);

        let collides = self.layers.iter().any(|l| {
            l.id != dragged.id
                && l.track_id == track_id
                && overlaps(placement.start, placement.end, l.start, l.end)
        });
        if collides {
            return Err(CoreError::OverlapDetected);
        }

        if let Some(layer) = self.layers.iter_mut().find(|l| l.id == layer_id) {
            layer.track_id = track_id.to_string();
            layer.start = placement.start;
            layer.end = placement.end;
        }
        Ok(())
    }

    /// Split a layer at `split_time`, replacing it with two contiguous
    /// halves. The position must be strictly between start and end.
    /// Returns the (left, right) ids.
    pub fn split_layer(&mut self, layer_id: &str, split_time: f64) -> Result<(String, String)> {
        let index = self
            .layers
            .iter()
            .position(|l| l.id == layer_id)
            .ok_or_else(|| CoreError::LayerNotFound(layer_id.to_string()))?;

        let layer = &self.layers[index];
        if split_time <= layer.start || split_time >= layer.end {
            return Err(CoreError::InvalidOperation(
                "split position must be strictly between layer start and end".into(),
            ));
        }

        let (left, right) = split(layer, split_time);
        let ids = (left.id.clone(), right.id.clone());
        self.layers[index] = left;
        self.layers.insert(index + 1, right);
        Ok(ids)
    }

    /// Remove a layer by its id. Returns the removed layer.
    pub fn remove_layer(&mut self, layer_id: &str) -> Result<Layer> {
        let index = self
            .layers
            .iter()
            .position(|l| l.id == layer_id)
            .ok_or_else(|| CoreError::LayerNotFound(layer_id.to_string()))?;
        Ok(self.layers.remove(index))
    }

    pub fn layer(&self, layer_id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == layer_id)
    }

    pub fn layers_on_track(&self, track_id: &str) -> Vec<&Layer> {
        self.layers
            .iter()
            .filter(|l| l.track_id == track_id)
            .collect()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
