/// A variable in the store of a calculation session.
///
/// Variables are written by assignments (`x = 5 m`) and keep the unit the
/// assigned expression had at that moment.
///
/// # Examples
///
/// ```
/// use mdcalc::Variable;
///
/// let v = Variable::new(9.81, "m/s2");
/// assert_eq!(v.value, 9.81);
/// assert_eq!(v.unit, "m/s2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub value: f64,

    /// Unit tag; empty for dimensionless values
    pub unit: String,
}

impl Variable {
    pub fn new(value: f64, unit: &str) -> Self {
        Variable {
            value,
            unit: unit.to_string(),
        }
    }
}
