use serde_json::Value;

/// Lazily yields the numeric scalars of an arbitrarily nested coordinate structure, depth
/// first and left to right.
///
/// Every position contributes its components in order, so a 2D ring flattens to
/// `x0, y0, x1, y1, ...`. Components after the second are passed through as additional
/// values. A bare number yields itself, and empty arrays or non-numeric leaves yield
/// nothing.
///
/// The iterator is cheap to [`Clone`], so the same sequence can be walked more than once.
///
/// # Examples
///
/// ```
/// use geoshard::algorithm::FlatCoords;
/// use serde_json::json;
///
/// let ring = json!([[[0.0, 1.0], [2.0, 3.0]], []]);
/// let flat: Vec<f64> = FlatCoords::new(&ring).collect();
/// assert_eq!(flat, vec![0.0, 1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct FlatCoords<'a> {
    root: Option<&'a Value>,
    stack: Vec<std::slice::Iter<'a, Value>>,
}

impl<'a> FlatCoords<'a> {
    pub fn new(coords: &'a Value) -> Self {
        Self {
            root: Some(coords),
            stack: Vec::new(),
        }
    }
}

impl<'a> Iterator for FlatCoords<'a> {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let value = match self.root.take() {
                Some(root) => root,
                None => {
                    let next = self.stack.last_mut()?.next();
                    match next {
                        Some(value) => value,
                        None => {
                            self.stack.pop();
                            continue;
                        }
                    }
                }
            };

            match value {
                Value::Array(items) => self.stack.push(items.iter()),
                Value::Number(number) => {
                    if let Some(scalar) = number.as_f64() {
                        return Some(scalar);
                    }
                }
                _ => {}
            }
        }
    }
}
