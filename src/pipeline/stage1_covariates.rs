use crate::error::CovariateError;
use crate::model::covariates::CovariateSet;
use crate::model::instrument::Instrument;

pub fn parse_assignment(text: &str) -> Result<(&str, &str), CovariateError> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| CovariateError::MalformedAssignment(text.to_string()))?;
    let name = name.trim();
    if name.is_empty() || value.trim().is_empty() {
        return Err(CovariateError::MalformedAssignment(text.to_string()));
    }
    Ok((name, value))
}

/// Builds a validated covariate set from `NAME=VALUE` assignments.
pub fn build_covariates(
    instrument: &Instrument,
    assignments: &[String],
) -> Result<CovariateSet, CovariateError> {
    let mut set = CovariateSet::new();
    for text in assignments {
        let (name, raw) = parse_assignment(text)?;
        let spec = instrument
            .covariate(name)
            .ok_or_else(|| CovariateError::Unknown(name.to_string()))?;
        let value = spec.parse(raw)?;
        if set.insert(spec.name.clone(), value).is_some() {
            return Err(CovariateError::Duplicate(spec.name.clone()));
        }
    }
    require_all(instrument, &set)?;
    Ok(set)
}

/// Checks a caller-built set against the instrument's declared domains and
/// returns it in canonical form.
pub fn validate_covariates(
    instrument: &Instrument,
    covariates: &CovariateSet,
) -> Result<CovariateSet, CovariateError> {
    let mut out = CovariateSet::new();
    for (name, value) in covariates.iter() {
        let spec = instrument
            .covariate(name)
            .ok_or_else(|| CovariateError::Unknown(name.to_string()))?;
        out.insert(spec.name.clone(), spec.coerce(value)?);
    }
    require_all(instrument, &out)?;
    Ok(out)
}

fn require_all(instrument: &Instrument, set: &CovariateSet) -> Result<(), CovariateError> {
    for spec in &instrument.covariates {
        if set.get(&spec.name).is_none() {
            return Err(CovariateError::Missing(spec.name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_covariates.rs"]
mod tests;
