//! Lens database: fitted lenses stored as JSON files, one lens per file.
//!
//! A lens directory holds `<id>.json` files. Loading never fails as a whole: files that
//! cannot be read or parsed are reported and skipped, and validation of a single lens
//! happens when it is requested.
//!
//! Coefficient arrays are dense and indexed by the graded monomial basis over all five
//! inputs (see [`crate::lenses::polynomial::monomial_basis`]). Every file states this with
//! `"basis": "graded5"` inside `coefficients`. Files without it, such as two-variable
//! `x^i y^j` fits, fail to parse instead of being read in the wrong order.
use super::constants::{LensConstants, PupilGeometry};
use super::lens::Lens;
use super::polynomial::{CoefficientSet, PolynomialChannel, Term, MAX_DEGREE};
use crate::core::fileutil::files_with_extension;
use crate::core::types::Float;
use crate::error::LensDatabaseError;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Id of the built-in placeholder lens.
pub const DOUBLE_GAUSS_50MM: &str = "double_gauss_50mm";

/// Monomial ordering of the dense coefficient arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoefficientBasis {
    /// Graded basis over x, y, dx, dy, lambda.
    #[default]
    Graded5
}

/// Dense coefficient arrays of a lens file, indexed by the graded monomial basis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoefficientArrays {
    pub basis: CoefficientBasis,
    #[serde(default)]
    pub exit_pupil_x: Vec<Float>,
    #[serde(default)]
    pub exit_pupil_y: Vec<Float>,
    #[serde(default)]
    pub exit_pupil_dx: Vec<Float>,
    #[serde(default)]
    pub exit_pupil_dy: Vec<Float>
}

/// On-disk form of a lens. Physical fields left out take the double Gauss values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensFile {
    pub name: String,
    pub focal_length: Float,
    /// Maximum aperture, i.e. the smallest f-number.
    pub max_fstop: Float,
    pub polynomial_degree: u32,
    pub coefficients: CoefficientArrays,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_diagonal: Option<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_pupil_radius: Option<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_pupil_curvature_radius: Option<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_pupil_curvature_height: Option<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_pupil_radius: Option<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_pupil_curvature_radius: Option<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_view: Option<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aperture_radius: Option<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_pupil_geometry: Option<PupilGeometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_pupil_geometry: Option<PupilGeometry>,

    /// Free-form descriptive fields (manufacturer, patent, notes). Searched, never interpreted.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>
}

impl LensFile {
    /// Check the file and build the lens it describes.
    pub fn to_lens(&self, id: &str) -> Result<Lens, LensDatabaseError> {
        let invalid = |reason: String| LensDatabaseError::Invalid { id: id.to_owned(), reason };

        if !(self.focal_length > 0.0) {
            return Err(invalid(format!("focal_length must be > 0, got {}", self.focal_length)));
        }
        if !(self.max_fstop > 0.0) {
            return Err(invalid(format!("max_fstop must be > 0, got {}", self.max_fstop)));
        }
        if self.polynomial_degree < 1 {
            return Err(invalid(String::from("polynomial_degree must be at least 1")));
        }
        if self.polynomial_degree > MAX_DEGREE {
            return Err(invalid(format!("polynomial_degree must be at most {}, got {}", MAX_DEGREE, self.polynomial_degree)));
        }
        let c = &self.coefficients;
        if c.exit_pupil_x.is_empty() || c.exit_pupil_y.is_empty() {
            return Err(invalid(String::from("exit_pupil_x and exit_pupil_y coefficients are required")));
        }

        let coefficients = CoefficientSet::from_dense(
            self.polynomial_degree,
            [&c.exit_pupil_x[..], &c.exit_pupil_y[..], &c.exit_pupil_dx[..], &c.exit_pupil_dy[..]]
        ).map_err(|source| LensDatabaseError::Polynomial { id: id.to_owned(), source })?;

        Ok(Lens::new(id, self.constants(), coefficients))
    }

    fn constants(&self) -> LensConstants {
        let defaults = LensConstants::double_gauss_50mm();
        LensConstants {
            name: self.name.clone(),
            focal_length: self.focal_length,
            fstop_min: self.max_fstop,
            outer_pupil_radius: self.outer_pupil_radius.unwrap_or(defaults.outer_pupil_radius),
            outer_pupil_curvature_radius: self.outer_pupil_curvature_radius.unwrap_or(defaults.outer_pupil_curvature_radius),
            outer_pupil_curvature_height: self.outer_pupil_curvature_height.unwrap_or(defaults.outer_pupil_curvature_height),
            inner_pupil_radius: self.inner_pupil_radius.unwrap_or(defaults.inner_pupil_radius),
            inner_pupil_curvature_radius: self.inner_pupil_curvature_radius.unwrap_or(defaults.inner_pupil_curvature_radius),
            field_of_view: self.field_of_view.unwrap_or(defaults.field_of_view),
            // Wide open entrance pupil radius, f / (2 N)
            aperture_radius_at_fstop_min: self.aperture_radius
                .unwrap_or(0.5 * self.focal_length / self.max_fstop),
            sensor_diagonal: self.sensor_diagonal.unwrap_or(defaults.sensor_diagonal),
            outer_pupil_geometry: self.outer_pupil_geometry.unwrap_or(defaults.outer_pupil_geometry),
            inner_pupil_geometry: self.inner_pupil_geometry.unwrap_or(defaults.inner_pupil_geometry)
        }
    }
}

/// Placeholder polynomial of the 50mm double Gauss design.
///
/// A linear focal term, position transfer, chromatic shift, a coma-like cross term and a
/// spherical-like term per output.
pub fn double_gauss_50mm_coefficients() -> CoefficientSet {
    // Exponent order: x, y, dx, dy, lambda
    let out_x = PolynomialChannel::new(vec![
        Term::new(50.0, [0, 0, 1, 0, 0]),
        Term::new(0.8, [1, 0, 0, 0, 0]),
        Term::new(-0.3, [1, 0, 0, 0, 1]),
        Term::new(-15.0, [0, 0, 1, 2, 0]),
        Term::new(-0.05, [3, 0, 0, 0, 0]),
        Term::new(-0.05, [1, 2, 0, 0, 0]),
    ]);
    let out_y = PolynomialChannel::new(vec![
        Term::new(50.0, [0, 0, 0, 1, 0]),
        Term::new(0.8, [0, 1, 0, 0, 0]),
        Term::new(-0.3, [0, 1, 0, 0, 1]),
        Term::new(-15.0, [0, 0, 2, 1, 0]),
        Term::new(-0.05, [2, 1, 0, 0, 0]),
        Term::new(-0.05, [0, 3, 0, 0, 0]),
    ]);
    let out_dx = PolynomialChannel::new(vec![
        Term::new(1.0, [0, 0, 1, 0, 0]),
        Term::new(0.001, [1, 0, 0, 0, 0]),
        Term::new(-0.002, [1, 0, 0, 0, 1]),
        Term::new(-0.01, [0, 0, 3, 0, 0]),
        Term::new(-0.01, [0, 0, 1, 2, 0]),
    ]);
    let out_dy = PolynomialChannel::new(vec![
        Term::new(1.0, [0, 0, 0, 1, 0]),
        Term::new(0.001, [0, 1, 0, 0, 0]),
        Term::new(-0.002, [0, 1, 0, 0, 1]),
        Term::new(-0.01, [0, 0, 2, 1, 0]),
        Term::new(-0.01, [0, 0, 0, 3, 0]),
    ]);
    CoefficientSet::from_channels([out_x, out_y, out_dx, out_dy])
}

lazy_static! {
    static ref BUILTIN_LENSES: Vec<Lens> = vec![
        Lens::new(DOUBLE_GAUSS_50MM, LensConstants::double_gauss_50mm(), double_gauss_50mm_coefficients())
    ];
}

/// A lens compiled into the library.
pub fn builtin(id: &str) -> Option<&'static Lens> {
    BUILTIN_LENSES.iter().find(|l| l.id == id)
}

/// All lenses compiled into the library.
pub fn builtin_lenses() -> &'static [Lens] {
    &BUILTIN_LENSES
}

/// Lens files of one directory plus the built-in lenses.
///
/// A file whose stem matches a built-in id takes precedence over the built-in lens.
#[derive(Debug, Default)]
pub struct LensDatabase {
    path: Option<PathBuf>,
    files: HashMap<String, LensFile>
}

impl LensDatabase {
    /// A database holding only the built-in lenses.
    pub fn builtin_only() -> LensDatabase {
        LensDatabase::default()
    }

    /// Scan `dir` for `*.json` lens files.
    pub fn load<P: AsRef<Path>>(dir: P) -> LensDatabase {
        let dir = dir.as_ref();
        let mut database = LensDatabase { path: Some(dir.to_path_buf()), files: HashMap::new() };

        let paths = match files_with_extension(dir, "json") {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Lens directory {} is not readable: {}", dir.display(), e);
                return database;
            }
        };
        if paths.is_empty() {
            warn!("No lens files found in {}", dir.display());
        }

        for path in paths {
            let id = match path.file_stem().and_then(|s| s.to_str()) {
                Some(id) => id.to_owned(),
                None => {
                    warn!("Skipping lens file with a non UTF-8 name: {}", path.display());
                    continue;
                }
            };
            match read_lens_file(&path) {
                Ok(file) => {
                    debug!("Loaded lens '{}' ({}) from {}", id, file.name, path.display());
                    database.files.insert(id, file);
                }
                Err(e) => warn!("Skipping lens file: {}", e)
            }
        }
        info!("Loaded {} lens file(s) from {}", database.files.len(), dir.display());
        database
    }

    /// Directory the database was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Raw file contents for `id`, if it came from disk.
    pub fn file(&self, id: &str) -> Option<&LensFile> {
        self.files.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.files.contains_key(id) || builtin(id).is_some()
    }

    /// Validate and build the lens `id`.
    pub fn get(&self, id: &str) -> Result<Lens, LensDatabaseError> {
        if let Some(file) = self.files.get(id) {
            return file.to_lens(id);
        }
        builtin(id).cloned().ok_or_else(|| LensDatabaseError::NotFound(id.to_owned()))
    }

    /// `(id, display name)` of every lens, sorted by display name.
    pub fn lens_list(&self) -> Vec<(String, String)> {
        let mut list: Vec<(String, String)> = self.files.iter()
            .map(|(id, file)| (id.clone(), file.name.clone()))
            .collect();
        for lens in builtin_lenses() {
            if !self.files.contains_key(&lens.id) {
                list.push((lens.id.clone(), lens.constants.name.clone()));
            }
        }
        list.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        list
    }

    /// Lenses whose id, name or metadata contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<(String, String)> {
        let query = query.to_lowercase();
        self.lens_list().into_iter()
            .filter(|(id, name)| {
                id.to_lowercase().contains(&query)
                    || name.to_lowercase().contains(&query)
                    || self.files.get(id).map_or(false, |file| metadata_matches(&file.metadata, &query))
            })
            .collect()
    }

    /// Re-read every lens file of the directory and check it.
    ///
    /// Built-in lenses not shadowed by a file count as valid. Both lists are sorted by id.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        if let Some(dir) = &self.path {
            match files_with_extension(dir, "json") {
                Ok(paths) => {
                    for path in paths {
                        let id = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
                        match read_lens_file(&path).and_then(|file| file.to_lens(&id)) {
                            Ok(_) => report.valid.push(id),
                            Err(e) => report.invalid.push((id, e))
                        }
                    }
                }
                Err(source) => report.invalid.push((
                    dir.display().to_string(),
                    LensDatabaseError::Io { path: dir.clone(), source }
                ))
            }
        }
        for lens in builtin_lenses() {
            if !report.valid.contains(&lens.id) && !report.invalid.iter().any(|(id, _)| *id == lens.id) {
                report.valid.push(lens.id.clone());
            }
        }
        report.valid.sort();
        report.invalid.sort_by(|a, b| a.0.cmp(&b.0));
        debug!("Validated lenses: {} valid, {} invalid", report.valid.len(), report.invalid.len());
        report
    }

    pub fn len(&self) -> usize {
        self.lens_list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of [`LensDatabase::validate`].
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub valid: Vec<String>,
    pub invalid: Vec<(String, LensDatabaseError)>
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.invalid.is_empty()
    }
}

fn metadata_matches(metadata: &serde_json::Map<String, serde_json::Value>, query: &str) -> bool {
    metadata.iter().any(|(key, value)| {
        let text = match value {
            serde_json::Value::String(s) => s.to_lowercase(),
            other => other.to_string().to_lowercase()
        };
        key.to_lowercase().contains(query) || text.contains(query)
    })
}

/// Read and parse one lens file.
pub fn read_lens_file(path: &Path) -> Result<LensFile, LensDatabaseError> {
    let text = fs::read_to_string(path)
        .map_err(|source| LensDatabaseError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&text)
        .map_err(|source| LensDatabaseError::Json { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lenses::evaluate::OpticalSample;

    fn lens_file(degree: u32, x: Vec<Float>, y: Vec<Float>) -> LensFile {
        LensFile {
            name: String::from("Test"),
            focal_length: 35.0,
            max_fstop: 2.0,
            polynomial_degree: degree,
            coefficients: CoefficientArrays { exit_pupil_x: x, exit_pupil_y: y, ..CoefficientArrays::default() },
            sensor_diagonal: None,
            outer_pupil_radius: None,
            outer_pupil_curvature_radius: None,
            outer_pupil_curvature_height: None,
            inner_pupil_radius: None,
            inner_pupil_curvature_radius: None,
            field_of_view: None,
            aperture_radius: None,
            outer_pupil_geometry: None,
            inner_pupil_geometry: None,
            metadata: serde_json::Map::new()
        }
    }

    #[test]
    fn builtin_should_provide_double_gauss() {
        let lens = builtin(DOUBLE_GAUSS_50MM).unwrap();
        assert_eq!(lens.constants.focal_length, 50.0);
        assert_eq!(lens.coefficients.degree(), 3);
        assert!(builtin("missing").is_none());
    }

    #[test]
    fn lens_file_should_parse_minimal_json() {
        let json = r#"{
            "name": "Minimal",
            "focal_length": 35,
            "max_fstop": 2.0,
            "polynomial_degree": 1,
            "coefficients": { "basis": "graded5", "exit_pupil_x": [0, 1, 0, 35], "exit_pupil_y": [0, 0, 1, 0, 35] }
        }"#;
        let file: LensFile = serde_json::from_str(json).unwrap();
        let lens = file.to_lens("minimal").unwrap();
        assert_eq!(lens.id, "minimal");
        assert_eq!(lens.constants.sensor_diagonal, LensConstants::double_gauss_50mm().sensor_diagonal);
        assert!((lens.constants.aperture_radius_at_fstop_min - 8.75).abs() < 1e-5);

        let out = lens.evaluate(&OpticalSample::new(1.0, 2.0, 0.1, 0.2, 0.55));
        assert!((out.x - 4.5).abs() < 1e-5);
        assert!((out.y - 9.0).abs() < 1e-5);
        assert_eq!(out.dx, 0.0);
    }

    #[test]
    fn lens_file_should_reject_bad_values() {
        let mut file = lens_file(1, vec![1.0], vec![1.0]);
        file.focal_length = 0.0;
        assert!(matches!(file.to_lens("a"), Err(LensDatabaseError::Invalid { .. })));

        let mut file = lens_file(1, vec![1.0], vec![1.0]);
        file.max_fstop = -1.0;
        assert!(matches!(file.to_lens("a"), Err(LensDatabaseError::Invalid { .. })));

        let file = lens_file(0, vec![1.0], vec![1.0]);
        assert!(matches!(file.to_lens("a"), Err(LensDatabaseError::Invalid { .. })));

        let file = lens_file(1, vec![1.0], vec![]);
        assert!(matches!(file.to_lens("a"), Err(LensDatabaseError::Invalid { .. })));

        let file = lens_file(1, vec![0.0; 7], vec![1.0]);
        assert!(matches!(file.to_lens("a"), Err(LensDatabaseError::Polynomial { .. })));
    }

    #[test]
    fn lens_file_should_reject_huge_degree() {
        let json = r#"{
            "name": "Huge",
            "focal_length": 35,
            "max_fstop": 2.0,
            "polynomial_degree": 4294967295,
            "coefficients": { "basis": "graded5", "exit_pupil_x": [0, 1], "exit_pupil_y": [0, 0, 1] }
        }"#;
        let file: LensFile = serde_json::from_str(json).unwrap();
        assert!(matches!(file.to_lens("huge"), Err(LensDatabaseError::Invalid { .. })));

        let file = lens_file(MAX_DEGREE + 1, vec![1.0], vec![1.0]);
        assert!(matches!(file.to_lens("a"), Err(LensDatabaseError::Invalid { .. })));
        assert!(lens_file(MAX_DEGREE, vec![1.0], vec![1.0]).to_lens("a").is_ok());
    }

    #[test]
    fn lens_file_should_require_coefficient_basis() {
        let json = r#"{
            "name": "Two variable fit",
            "focal_length": 35,
            "max_fstop": 2.0,
            "polynomial_degree": 1,
            "coefficients": { "exit_pupil_x": [0, 1, 0], "exit_pupil_y": [0, 0, 1] }
        }"#;
        assert!(serde_json::from_str::<LensFile>(json).is_err());
        let json = json.replace(r#""exit_pupil_x""#, r#""basis": "xy", "exit_pupil_x""#);
        assert!(serde_json::from_str::<LensFile>(&json).is_err());
    }

    #[test]
    fn search_should_match_name_and_metadata() {
        let mut database = LensDatabase::builtin_only();
        let mut file = lens_file(1, vec![1.0], vec![1.0]);
        file.name = String::from("Wide 24mm");
        file.metadata.insert(String::from("manufacturer"), serde_json::Value::from("Zeiss"));
        database.files.insert(String::from("wide_24mm"), file);

        let ids = |hits: Vec<(String, String)>| hits.into_iter().map(|(id, _)| id).collect::<Vec<_>>();
        assert_eq!(ids(database.search("zeiss")), vec!["wide_24mm"]);
        assert_eq!(ids(database.search("GAUSS")), vec![DOUBLE_GAUSS_50MM]);
        assert_eq!(ids(database.search("mm")), vec![DOUBLE_GAUSS_50MM, "wide_24mm"]);
        assert!(database.search("canon").is_empty());
    }

    #[test]
    fn validate_should_report_builtin_lenses() {
        let report = LensDatabase::builtin_only().validate();
        assert!(report.is_ok());
        assert_eq!(report.valid, vec![DOUBLE_GAUSS_50MM]);
    }

    #[test]
    fn database_should_fall_back_to_builtin() {
        let database = LensDatabase::builtin_only();
        assert!(database.get(DOUBLE_GAUSS_50MM).is_ok());
        assert!(matches!(database.get("nope"), Err(LensDatabaseError::NotFound(_))));
        assert_eq!(database.lens_list(), vec![(String::from(DOUBLE_GAUSS_50MM), String::from("Double Gauss 50mm f/2.8"))]);
        assert!(database.path().is_none());
    }
}
