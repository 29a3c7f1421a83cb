// =============================================================================
// ERROR — Les erreurs structurelles du moteur
// =============================================================================
//
// Une seule énumération pour tout le cœur. Les erreurs structurelles
// (objet inconnu, composition impossible, foncteur incomplet) remontent
// immédiatement à l'appelant : seul l'auteur du schéma peut les corriger.
//
// Les violations de lois fonctorielles ne sont PAS des erreurs : voir
// `functor::LawViolation`, qui est un diagnostic.
//
// =============================================================================

use std::fmt;

use thiserror::Error;

use super::category::Object;
use super::typeside::Value;

/// Résultat standard du moteur.
pub type Result<T> = std::result::Result<T, Error>;

/// Pourquoi une composition `g ∘ f` a été refusée.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionFailure {
    /// `f.target != g.source`
    NotComposable,
    /// Composables, mais aucune entrée dans la table de composition
    NoComposite,
    /// Le composé déclaré ne va pas de `f.source` vers `g.target`
    BadComposite,
    /// Une entrée de table contredit la loi d'identité
    IdentityLaw,
    /// `(f;g);k` et `f;(g;k)` donnent deux morphismes différents
    NonAssociative,
}

impl fmt::Display for CompositionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CompositionFailure::NotComposable => "la cible de l'un n'est pas la source de l'autre",
            CompositionFailure::NoComposite => "aucun composé enregistré ni dérivable",
            CompositionFailure::BadComposite => "le composé déclaré n'a pas les bonnes extrémités",
            CompositionFailure::IdentityLaw => "la table contredit la loi d'identité",
            CompositionFailure::NonAssociative => "la composition n'est pas associative",
        };
        write!(f, "{}", msg)
    }
}

/// Erreurs structurelles du moteur.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Objet absent de la catégorie indiquée.
    #[error("objet '{object}' inconnu dans la catégorie '{category}'")]
    UnknownObject { object: Object, category: String },

    /// Morphisme absent de la catégorie indiquée.
    #[error("morphisme '{morphism}' inconnu dans la catégorie '{category}'")]
    UnknownMorphism { morphism: String, category: String },

    /// Nom de morphisme déclaré deux fois (ou réservé à une identité).
    #[error("morphisme '{morphism}' déjà déclaré dans la catégorie '{category}'")]
    DuplicateMorphism { morphism: String, category: String },

    /// Composition impossible ou incohérente.
    #[error("composition de '{left}' puis '{right}' refusée : {reason}")]
    Composition {
        left: String,
        right: String,
        reason: CompositionFailure,
    },

    /// Le foncteur n'a pas d'image pour cet objet.
    #[error("le foncteur '{functor}' n'envoie l'objet '{object}' nulle part")]
    UnmappedObject { object: Object, functor: String },

    /// Le foncteur n'a pas d'image pour ce morphisme.
    #[error("le foncteur '{functor}' n'envoie le morphisme '{morphism}' nulle part")]
    UnmappedMorphism { morphism: String, functor: String },

    /// Une instance n'est pas sur la catégorie attendue.
    #[error("instance sur '{found}' alors que la catégorie attendue est '{expected}'")]
    CategoryMismatch { expected: String, found: String },

    /// Image ou table explicite fournie pour un morphisme identité.
    #[error("'{morphism}' est une identité : son image est dérivée, elle ne se déclare pas")]
    IdentityFunction { morphism: String },

    /// Table qui oublie un élément de l'ensemble source.
    #[error("la fonction de '{morphism}' n'est pas définie en {value}")]
    NonTotalFunction { morphism: String, value: Value },

    /// Table qui envoie un élément hors de l'ensemble cible.
    #[error("la fonction de '{morphism}' envoie {value} sur {image}, absent de la cible")]
    ImageOutsideTarget {
        morphism: String,
        value: Value,
        image: Value,
    },

    /// Table qui donne deux images distinctes au même élément.
    #[error("la fonction de '{morphism}' envoie {value} à la fois sur {first} et sur {second}")]
    ConflictingImages {
        morphism: String,
        value: Value,
        first: Value,
        second: Value,
    },

    /// Poids négatif ou non fini en moyenne pondérée.
    #[error("poids invalide {weight} pour l'objet '{object}'")]
    InvalidWeight { object: Object, weight: f64 },

    /// Valeur non numérique rencontrée en mode `NonNumeric::Reject`.
    #[error("valeur non numérique {value} dans la fibre de '{object}'")]
    NonNumericValue { object: Object, value: Value },

    /// Ensemble de morphismes d'instances trop grand pour être énuméré.
    #[error("{candidates} candidats à énumérer, au-delà de la limite {limit}")]
    HomSetTooLarge { candidates: u128, limit: u128 },
}
