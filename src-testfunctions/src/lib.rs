//! Optimization test functions library
//!
//! Benchmark objectives used to exercise the fireworks optimizers. Every
//! function takes a point and returns its value; lower is better. Functions
//! are organized by category:
//!
//! - **Unimodal**: single global optimum (sphere, rosenbrock, ...)
//! - **Multimodal**: many local minima (rastrigin, ackley, ...)
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use fwa_testfunctions::*;
//!
//! let x = Array1::from_vec(vec![0.0, 0.0]);
//! assert_eq!(sphere(&x), 0.0);
//!
//! let bounds = get_function_bounds("rastrigin");
//! assert_eq!(bounds, Some((-5.12, 5.12)));
//! ```

use ndarray::Array1;
use std::collections::HashMap;

pub mod functions;
pub use functions::*;

/// Signature shared by every test function
pub type TestFunction = fn(&Array1<f64>) -> f64;

/// Metadata for a test function
#[derive(Debug, Clone)]
pub struct FunctionMetadata {
    /// Function name
    pub name: String,
    /// The function itself
    pub function: TestFunction,
    /// Bounds applied to every coordinate (min, max)
    pub bounds: (f64, f64),
    /// Value at the global minimum
    pub global_minimum: f64,
    /// Description of the function
    pub description: String,
    /// Whether the function is multimodal
    pub multimodal: bool,
    /// Typical dimension(s) for the function
    pub dimensions: Vec<usize>,
}

fn entry(
    name: &str,
    function: TestFunction,
    bounds: (f64, f64),
    description: &str,
    multimodal: bool,
) -> (String, FunctionMetadata) {
    (
        name.to_string(),
        FunctionMetadata {
            name: name.to_string(),
            function,
            bounds,
            global_minimum: 0.0,
            description: description.to_string(),
            multimodal,
            dimensions: vec![2, 5, 10, 30],
        },
    )
}

/// Get metadata for all available test functions
pub fn get_function_metadata() -> HashMap<String, FunctionMetadata> {
    HashMap::from([
        entry("sphere", sphere, (-100.0, 100.0), "N-dimensional convex bowl", false),
        entry("quadratic", quadratic, (-10.0, 10.0), "Shifted convex bowl, minimum at 1", false),
        entry("rosenbrock", rosenbrock, (-5.0, 10.0), "Curved narrow valley", false),
        entry("elliptic", elliptic, (-100.0, 100.0), "Ill-conditioned ellipsoid", false),
        entry("rastrigin", rastrigin, (-5.12, 5.12), "Regular grid of local minima", true),
        entry("ackley", ackley, (-32.768, 32.768), "Flat plateau with a central hole", true),
        entry("griewank", griewank, (-600.0, 600.0), "Product-coupled cosine ripples", true),
        entry("schwefel", schwefel, (-500.0, 500.0), "Deceptive, optimum near the box edge", true),
    ])
}

/// Get the search box of a function by name
pub fn get_function_bounds(function_name: &str) -> Option<(f64, f64)> {
    get_function_metadata().get(function_name).map(|meta| meta.bounds)
}

/// Get a function by name
pub fn get_function(function_name: &str) -> Option<TestFunction> {
    get_function_metadata().get(function_name).map(|meta| meta.function)
}
