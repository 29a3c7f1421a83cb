// =============================================================================
// VALIDATE — Rapports de cohérence complets
// =============================================================================
//
// Les constructeurs refusent déjà ce qui est structurellement faux. Ce
// module va plus loin et liste TOUS les défauts d'une structure, sans
// s'arrêter au premier :
//   - une Catégorie dont la table de composition n'est pas close
//   - un Foncteur qui viole ses lois
//   - une Instance qui n'est pas fonctorielle : I(g∘f) ≠ I(g)∘I(f),
//     ou dont une identité implicite sort de l'ensemble cible
//
// Les migrations restent correctes SEULEMENT si les structures sont
// valides : ces rapports servent à l'auteur du schéma pendant qu'il itère.
//
// =============================================================================

use thiserror::Error;

use super::category::Category;
use super::functor::Functor;
use super::instance::Instance;

/// Erreur de validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation error: {message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(message: String) -> Self {
        ValidationError { message }
    }
}

fn into_report(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Vérifie qu'une catégorie est close pour la composition.
///
/// Chaque paire composable de morphismes non identités doit avoir un
/// composé dans la table.
pub fn validate_category(category: &Category) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (f, g) in category.composable_pairs() {
        if f.is_identity() || g.is_identity() {
            continue;
        }
        if let Err(e) = category.compose(f, g) {
            errors.push(ValidationError::new(format!(
                "catégorie '{}' non close : {}",
                category.name(),
                e
            )));
        }
    }

    into_report(errors)
}

/// Vérifie qu'un foncteur respecte ses lois. Chaque violation devient
/// une entrée du rapport.
pub fn validate_functor(functor: &Functor) -> Result<(), Vec<ValidationError>> {
    let errors = functor
        .law_violations()
        .into_iter()
        .map(|v| ValidationError::new(format!("foncteur '{}' : {}", functor.name(), v)))
        .collect();
    into_report(errors)
}

/// Vérifie qu'une instance est un foncteur K → Set.
///
/// Conditions :
/// - une fonction implicite (identité par défaut) doit rester dans l'ensemble cible
/// - pour chaque composé h = compose(f, g) : I(h)(v) = I(g)(I(f)(v))
pub fn validate_instance(instance: &Instance) -> Result<(), Vec<ValidationError>> {
    let schema = instance.schema();
    let mut errors = Vec::new();

    for f in schema.generators() {
        if !instance.on_morphisms(f).is_identity() {
            continue;
        }
        let target = instance.on_objects(&f.target);
        for v in instance.on_objects(&f.source) {
            if !target.contains(v) {
                errors.push(ValidationError::new(format!(
                    "'{}' sans table : l'identité envoie {} hors de '{}'",
                    f.name, v, f.target
                )));
            }
        }
    }

    for (f, g) in schema.composable_pairs() {
        let Ok(h) = schema.compose(f, g) else {
            continue;
        };
        let (i_f, i_g, i_h) = (
            instance.on_morphisms(f),
            instance.on_morphisms(g),
            instance.on_morphisms(&h),
        );
        for v in instance.on_objects(&f.source) {
            let via_path = i_f.apply(v).and_then(|w| i_g.apply(&w));
            let direct = i_h.apply(v);
            if via_path != direct {
                errors.push(ValidationError::new(format!(
                    "composition violée en {} : {} ; {} donne {:?}, {} donne {:?}",
                    v, f.name, g.name, via_path, h.name, direct
                )));
            }
        }
    }

    into_report(errors)
}
