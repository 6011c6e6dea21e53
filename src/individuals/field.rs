use std::cell::RefCell;

/// Memoized intensity field of one individual, keyed by raster size.
///
/// Clones start empty, so copies kept in history never hold a raster.
#[derive(Debug, Default)]
pub struct FieldCache {
    entry: RefCell<Option<((usize, usize), Vec<f64>)>>,
}

impl Clone for FieldCache {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl FieldCache {
    pub fn get_or_compute<F>(&self, width: usize, height: usize, compute: F) -> Vec<f64>
    where
        F: FnOnce() -> Vec<f64>,
    {
        if let Some((size, field)) = self.entry.borrow().as_ref() {
            if *size == (width, height) {
                return field.clone();
            }
        }

        let field = compute();
        *self.entry.borrow_mut() = Some(((width, height), field.clone()));
        field
    }

    pub fn is_empty(&self) -> bool {
        self.entry.borrow().is_none()
    }

    pub fn clear(&mut self) {
        self.entry.get_mut().take();
    }
}

/// Sample `value(x, y)` over `[-1, 1]²` and squash with `(tanh(v) + 1) / 2`.
pub fn planar_field<F>(width: usize, height: usize, value: F) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64,
{
    let mut field = Vec::with_capacity(width * height);
    for py in 0..height {
        for px in 0..width {
            let x = (px as f64 / width as f64) * 2.0 - 1.0;
            let y = (py as f64 / height as f64) * 2.0 - 1.0;
            field.push((value(x, y).tanh() + 1.0) / 2.0);
        }
    }
    field
}
