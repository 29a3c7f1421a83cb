// =============================================================================
// CATMIG — Moteur de migration fonctorielle de données
// =============================================================================
//
// Catmig migre des données entre schémas en suivant la théorie des
// catégories : un schéma est une catégorie finie, des données sont un
// foncteur Schéma → Set, et un changement de schéma est un foncteur.
//
// Architecture :
//   core/  → Le cœur catégorique pur, entièrement en mémoire
//
// Concepts fondamentaux :
//   Category = objets + morphismes + table de composition
//   Instance = un foncteur Category → Set (les données)
//   Functor  = un foncteur entre catégories (comment restructurer)
//   Δ, Σ, Π  = migrations catégoriques (pullback, union, intersection)
//
// =============================================================================

pub mod core;

pub use crate::core::adjunction::{
    delta_pi_report, homomorphisms, sigma_delta_report, verify_adjunction_delta_pi,
    verify_adjunction_sigma_delta, AdjunctionReport, Transformation, DEFAULT_HOM_LIMIT,
};
pub use crate::core::category::{Category, CategoryBuilder, Morphism, MorphismKind, Object};
pub use crate::core::error::{CompositionFailure, Error, Result};
pub use crate::core::functor::{Functor, FunctorBuilder, LawViolation};
pub use crate::core::instance::{Instance, InstanceBuilder, ValueFn};
pub use crate::core::migrate::{
    delta, pi, sigma, Aggregation, NonNumeric, PiOptions, Predicate, SigmaOptions,
};
pub use crate::core::typeside::{BaseType, Value};
pub use crate::core::validate::{
    validate_category, validate_functor, validate_instance, ValidationError,
};
