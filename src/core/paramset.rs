//! Bundle up parameters and their values in a generic way.
//!
//! Values are kept in one list per type. A name is stored at most
//! once: adding a value removes any earlier value of the same name,
//! whatever its type. Lookups take a default which is returned for
//! absent names, and fail only if the stored value can't be coerced
//! to what the caller asks for.

// std
use std::sync::atomic::{AtomicBool, Ordering};
// others
use log::debug;
use strum_macros::{Display, EnumString};
// lights
use crate::core::geometry::{Normal3f, Point3f, Vector3f};
use crate::core::light::LightError;
use crate::core::pbrt::{Float, Spectrum};

/// The types a parameter can be declared with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ParamType {
    Bool,
    Integer,
    Float,
    #[strum(to_string = "point3", serialize = "point")]
    Point3,
    #[strum(to_string = "vector3", serialize = "vector")]
    Vector3,
    #[strum(to_string = "normal", serialize = "normal3")]
    Normal,
    #[strum(to_string = "rgb", serialize = "color")]
    Rgb,
    String,
}

#[derive(Debug)]
pub struct ParamSetItem<T> {
    pub name: String,
    pub values: Vec<T>,
    pub n_values: usize,
    pub looked_up: AtomicBool,
}

impl<T> ParamSetItem<T> {
    pub fn new(name: &str, values: Vec<T>) -> Self {
        let n_values: usize = values.len();
        ParamSetItem {
            name: String::from(name),
            values,
            n_values,
            looked_up: AtomicBool::new(false),
        }
    }
    fn mark_looked_up(&self) {
        self.looked_up.store(true, Ordering::Relaxed);
    }
    fn is_looked_up(&self) -> bool {
        self.looked_up.load(Ordering::Relaxed)
    }
    /// The single value of this item, or an error naming the count.
    fn single(&self) -> Result<&T, LightError> {
        self.mark_looked_up();
        if self.n_values == 1_usize {
            Ok(&self.values[0])
        } else {
            Err(LightError::invalid_parameter(
                &self.name,
                format!("expected a single value, found {}", self.n_values),
            ))
        }
    }
}

impl<T: Clone> Clone for ParamSetItem<T> {
    fn clone(&self) -> Self {
        ParamSetItem {
            name: self.name.clone(),
            values: self.values.clone(),
            n_values: self.n_values,
            looked_up: AtomicBool::new(false),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ParamSet {
    pub bools: Vec<ParamSetItem<bool>>,
    pub ints: Vec<ParamSetItem<i32>>,
    pub floats: Vec<ParamSetItem<Float>>,
    pub point3fs: Vec<ParamSetItem<Point3f>>,
    pub vector3fs: Vec<ParamSetItem<Vector3f>>,
    pub normals: Vec<ParamSetItem<Normal3f>>,
    pub spectra: Vec<ParamSetItem<Spectrum>>,
    pub strings: Vec<ParamSetItem<String>>,
}

impl ParamSet {
    pub fn add_float(&mut self, name: &str, value: Float) {
        self.add_floats(name, vec![value]);
    }
    pub fn add_floats(&mut self, name: &str, values: Vec<Float>) {
        self.erase(name);
        self.floats.push(ParamSetItem::new(name, values));
    }
    pub fn add_int(&mut self, name: &str, value: i32) {
        self.add_ints(name, vec![value]);
    }
    pub fn add_ints(&mut self, name: &str, values: Vec<i32>) {
        self.erase(name);
        self.ints.push(ParamSetItem::new(name, values));
    }
    pub fn add_bool(&mut self, name: &str, value: bool) {
        self.erase(name);
        self.bools.push(ParamSetItem::new(name, vec![value]));
    }
    pub fn add_point3f(&mut self, name: &str, value: Point3f) {
        self.erase(name);
        self.point3fs.push(ParamSetItem::new(name, vec![value]));
    }
    pub fn add_point3fs(&mut self, name: &str, values: Vec<Float>) -> Result<(), LightError> {
        let triples = split_triples(name, "point", &values)?;
        self.erase(name);
        self.point3fs.push(ParamSetItem::new(
            name,
            triples
                .iter()
                .map(|t| Point3f::new(t[0], t[1], t[2]))
                .collect(),
        ));
        Ok(())
    }
    pub fn add_vector3f(&mut self, name: &str, value: Vector3f) {
        self.erase(name);
        self.vector3fs.push(ParamSetItem::new(name, vec![value]));
    }
    pub fn add_vector3fs(&mut self, name: &str, values: Vec<Float>) -> Result<(), LightError> {
        let triples = split_triples(name, "vector", &values)?;
        self.erase(name);
        self.vector3fs.push(ParamSetItem::new(
            name,
            triples
                .iter()
                .map(|t| Vector3f::new(t[0], t[1], t[2]))
                .collect(),
        ));
        Ok(())
    }
    pub fn add_normal3fs(&mut self, name: &str, values: Vec<Float>) -> Result<(), LightError> {
        let triples = split_triples(name, "normal", &values)?;
        self.erase(name);
        self.normals.push(ParamSetItem::new(
            name,
            triples
                .iter()
                .map(|t| Normal3f {
                    x: t[0],
                    y: t[1],
                    z: t[2],
                })
                .collect(),
        ));
        Ok(())
    }
    pub fn add_rgb_spectrum(&mut self, name: &str, value: Spectrum) {
        self.erase(name);
        self.spectra.push(ParamSetItem::new(name, vec![value]));
    }
    pub fn add_rgb_spectra(&mut self, name: &str, values: Vec<Float>) -> Result<(), LightError> {
        let triples = split_triples(name, "rgb", &values)?;
        self.erase(name);
        self.spectra.push(ParamSetItem::new(
            name,
            triples.iter().map(Spectrum::from_rgb).collect(),
        ));
        Ok(())
    }
    pub fn add_string(&mut self, name: &str, value: String) {
        self.erase(name);
        self.strings.push(ParamSetItem::new(name, vec![value]));
    }
    /// Remove the value stored under `name`, if any.
    pub fn erase(&mut self, name: &str) -> bool {
        let before: usize = self.len();
        self.bools.retain(|v| v.name != name);
        self.ints.retain(|v| v.name != name);
        self.floats.retain(|v| v.name != name);
        self.point3fs.retain(|v| v.name != name);
        self.vector3fs.retain(|v| v.name != name);
        self.normals.retain(|v| v.name != name);
        self.spectra.retain(|v| v.name != name);
        self.strings.retain(|v| v.name != name);
        self.len() != before
    }
    pub fn len(&self) -> usize {
        self.bools.len()
            + self.ints.len()
            + self.floats.len()
            + self.point3fs.len()
            + self.vector3fs.len()
            + self.normals.len()
            + self.spectra.len()
            + self.strings.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0_usize
    }
    /// The declared type of the value stored under `name`.
    pub fn type_of(&self, name: &str) -> Option<ParamType> {
        if find(&self.bools, name).is_some() {
            Some(ParamType::Bool)
        } else if find(&self.ints, name).is_some() {
            Some(ParamType::Integer)
        } else if find(&self.floats, name).is_some() {
            Some(ParamType::Float)
        } else if find(&self.point3fs, name).is_some() {
            Some(ParamType::Point3)
        } else if find(&self.vector3fs, name).is_some() {
            Some(ParamType::Vector3)
        } else if find(&self.normals, name).is_some() {
            Some(ParamType::Normal)
        } else if find(&self.spectra, name).is_some() {
            Some(ParamType::Rgb)
        } else if find(&self.strings, name).is_some() {
            Some(ParamType::String)
        } else {
            None
        }
    }
    pub fn get_bool(&self, name: &str, d: bool) -> Result<bool, LightError> {
        if let Some(v) = find(&self.bools, name) {
            return v.single().map(|b| *b);
        }
        self.absent_or_mismatch(name, "bool").map(|_| d)
    }
    pub fn get_int(&self, name: &str, d: i32) -> Result<i32, LightError> {
        if let Some(v) = find(&self.ints, name) {
            return v.single().map(|i| *i);
        }
        self.absent_or_mismatch(name, "integer").map(|_| d)
    }
    /// A scalar. Integers are accepted as well.
    pub fn get_float(&self, name: &str, d: Float) -> Result<Float, LightError> {
        if let Some(v) = find(&self.floats, name) {
            return v.single().map(|f| *f);
        }
        if let Some(v) = find(&self.ints, name) {
            return v.single().map(|i| *i as Float);
        }
        self.absent_or_mismatch(name, "float").map(|_| d)
    }
    pub fn get_string(&self, name: &str, d: &str) -> Result<String, LightError> {
        if let Some(v) = find(&self.strings, name) {
            return v.single().map(|s| s.clone());
        }
        self.absent_or_mismatch(name, "string")
            .map(|_| String::from(d))
    }
    pub fn get_vec3(&self, name: &str, d: Vector3f) -> Result<Vector3f, LightError> {
        Ok(self
            .get_triple(name)?
            .map_or(d, |t| Vector3f::new(t[0], t[1], t[2])))
    }
    pub fn get_point3(&self, name: &str, d: Point3f) -> Result<Point3f, LightError> {
        Ok(self
            .get_triple(name)?
            .map_or(d, |t| Point3f::new(t[0], t[1], t[2])))
    }
    pub fn get_spectrum(&self, name: &str, d: Spectrum) -> Result<Spectrum, LightError> {
        Ok(self
            .get_triple(name)?
            .map_or(d, |t| Spectrum::from_rgb(&t)))
    }
    /// Names which were never asked for since the set was built.
    pub fn report_unused(&self) -> Vec<String> {
        let mut unused: Vec<String> = Vec::new();
        collect_unused(&self.bools, &mut unused);
        collect_unused(&self.ints, &mut unused);
        collect_unused(&self.floats, &mut unused);
        collect_unused(&self.point3fs, &mut unused);
        collect_unused(&self.vector3fs, &mut unused);
        collect_unused(&self.normals, &mut unused);
        collect_unused(&self.spectra, &mut unused);
        collect_unused(&self.strings, &mut unused);
        for name in &unused {
            debug!("parameter \"{}\" not used", name);
        }
        unused
    }
    /// Anything with three components: points, vectors, normals, RGB
    /// values, or a list of exactly three numbers.
    fn get_triple(&self, name: &str) -> Result<Option<[Float; 3]>, LightError> {
        if let Some(v) = find(&self.point3fs, name) {
            return v.single().map(|p| Some([p.x, p.y, p.z]));
        }
        if let Some(v) = find(&self.vector3fs, name) {
            return v.single().map(|p| Some([p.x, p.y, p.z]));
        }
        if let Some(v) = find(&self.normals, name) {
            return v.single().map(|n| Some([n.x, n.y, n.z]));
        }
        if let Some(v) = find(&self.spectra, name) {
            return v.single().map(|s| Some(s.c));
        }
        if let Some(v) = find(&self.floats, name) {
            v.mark_looked_up();
            if v.n_values == 3_usize {
                return Ok(Some([v.values[0], v.values[1], v.values[2]]));
            }
            return Err(LightError::invalid_parameter(
                name,
                format!("expected 3 components, found {} float(s)", v.n_values),
            ));
        }
        if let Some(v) = find(&self.ints, name) {
            v.mark_looked_up();
            if v.n_values == 3_usize {
                return Ok(Some([
                    v.values[0] as Float,
                    v.values[1] as Float,
                    v.values[2] as Float,
                ]));
            }
            return Err(LightError::invalid_parameter(
                name,
                format!("expected 3 components, found {} integer(s)", v.n_values),
            ));
        }
        self.absent_or_mismatch(name, "3-component value")
            .map(|_| None)
    }
    /// `Ok` if nothing is stored under `name`, otherwise the stored
    /// value has a type the caller can't use.
    fn absent_or_mismatch(&self, name: &str, expected: &str) -> Result<(), LightError> {
        match self.type_of(name) {
            None => Ok(()),
            Some(found) => {
                self.mark_looked_up(name);
                Err(LightError::invalid_parameter(
                    name,
                    format!("expected {}, found {}", expected, found),
                ))
            }
        }
    }
    fn mark_looked_up(&self, name: &str) {
        mark(&self.bools, name);
        mark(&self.ints, name);
        mark(&self.floats, name);
        mark(&self.point3fs, name);
        mark(&self.vector3fs, name);
        mark(&self.normals, name);
        mark(&self.spectra, name);
        mark(&self.strings, name);
    }
}

fn find<'a, T>(items: &'a [ParamSetItem<T>], name: &str) -> Option<&'a ParamSetItem<T>> {
    items.iter().find(|v| v.name == name)
}

fn mark<T>(items: &[ParamSetItem<T>], name: &str) {
    if let Some(v) = find(items, name) {
        v.mark_looked_up();
    }
}

fn collect_unused<T>(items: &[ParamSetItem<T>], unused: &mut Vec<String>) {
    for v in items {
        if !v.is_looked_up() {
            unused.push(v.name.clone());
        }
    }
}

fn split_triples(name: &str, kind: &str, values: &[Float]) -> Result<Vec<[Float; 3]>, LightError> {
    if values.is_empty() || values.len() % 3 != 0 {
        return Err(LightError::invalid_parameter(
            name,
            format!(
                "{} parameters need 3 coordinates ({} found)",
                kind,
                values.len()
            ),
        ));
    }
    Ok(values
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect())
}
