use crate::object::{DynamicObject, UNKNOWN_LABEL};
use crate::store::GroundTruthFrame;
use crate::utils::bbox::BoundingBox;
use rand::distributions::Uniform;
use rand::prelude::ThreadRng;
use rand::Rng;

/// Generates a labeled object drifting across the image plane, one position
/// per iteration.
///
pub struct ObjectGen {
    label: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    gen: ThreadRng,
    dist_pos: Uniform<f32>,
    dist_box: Uniform<f32>,
}

impl ObjectGen {
    pub fn new(
        label: impl Into<String>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        pos_drift: f32,
        box_drift: f32,
    ) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            width,
            height,
            gen: rand::thread_rng(),
            dist_pos: Uniform::new(-pos_drift, pos_drift),
            dist_box: Uniform::new(-box_drift, box_drift),
        }
    }
}

impl Iterator for ObjectGen {
    type Item = DynamicObject;

    fn next(&mut self) -> Option<Self::Item> {
        self.x += self.gen.sample(self.dist_pos);
        self.y += self.gen.sample(self.dist_pos);

        self.width += self.gen.sample(self.dist_box);
        self.height += self.gen.sample(self.dist_box);

        if self.width < 1.0 {
            self.width = 1.0;
        }
        if self.height < 1.0 {
            self.height = 1.0;
        }

        Some(DynamicObject::new(
            self.label.clone(),
            BoundingBox::new(self.x, self.y, self.width, self.height),
            1.0,
        ))
    }
}

/// Builds a synthetic ground truth scene: `num_frames` frames starting at
/// `start` and spaced `step` timestamps apart, each advancing every generator
/// once.
pub fn synthetic_scene(
    generators: &mut [ObjectGen],
    start: u64,
    step: u64,
    num_frames: usize,
) -> Vec<GroundTruthFrame> {
    (0..num_frames)
        .map(|i| {
            let objects = generators.iter_mut().map(|g| g.next().unwrap()).collect();
            GroundTruthFrame::new(start + i as u64 * step, objects)
        })
        .collect()
}

/// Returns perturbed copies of the objects: every box translated by
/// (dx, dy) and roughly `label_to_unknown_rate` of the labels flipped to
/// "unknown". This is how the demo drivers fake an imperfect perception
/// output from the ground truth itself.
pub fn perturbed(
    objects: &[DynamicObject],
    dx: f32,
    dy: f32,
    label_to_unknown_rate: f32,
) -> Vec<DynamicObject> {
    let mut gen = rand::thread_rng();
    objects
        .iter()
        .map(|obj| {
            let label = if gen.gen::<f32>() < label_to_unknown_rate {
                UNKNOWN_LABEL
            } else {
                obj.label()
            };
            DynamicObject::new(label, obj.bbox().shifted(dx, dy), obj.confidence())
        })
        .collect()
}
