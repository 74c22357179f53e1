/// Read a cell value, using the identifier as the cell name.
///
/// Requires `DeserializeOwned`.
/// Returns `Result<T>`.
///
/// ```ignore
/// let report = get!(graph, report as Report)?;
/// let report: Report = get!(graph, report)?;
/// ```
#[macro_export]
macro_rules! get {
    ($graph:expr, $name:ident as $ty:ty) => {
        $graph.get_value::<$ty>(stringify!($name))
    };
    ($graph:expr, $name:ident) => {
        $graph.get_value(stringify!($name))
    };
}

/// Set a source cell, using the identifier as the cell name.
///
/// Requires `Serialize`.
/// Returns `Result<PassReport>`.
///
/// ```ignore
/// set!(graph, sample_size);
/// set!(graph, sample_size = 60i64);
/// ```
#[macro_export]
macro_rules! set {
    ($graph:expr, $var:ident) => {
        $graph.set_value(stringify!($var), &$var)
    };
    ($graph:expr, $name:ident = $value:expr) => {
        $graph.set_value(stringify!($name), &$value)
    };
}

/// Load a dependency value inside a compute function.
///
/// Requires `DeserializeOwned`.
/// Returns `Result<T>`.
///
/// ```ignore
/// graph.register_cell("statistics", &["dataset"], |inputs| {
///     let data = load!(inputs, dataset as Dataset)?;
///     summarize(&data)
/// })?;
/// ```
#[macro_export]
macro_rules! load {
    ($inputs:expr, $name:ident as $ty:ty) => {
        $inputs.load::<$ty>(stringify!($name))
    };
    ($inputs:expr, $name:ident) => {
        $inputs.load(stringify!($name))
    };
}
