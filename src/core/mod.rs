// =============================================================================
// CORE — Module principal du cœur catégorique
// =============================================================================
//
// Ce module regroupe toute la logique mathématique pure : des catégories
// finies, des foncteurs entre elles, des instances à valeurs dans Set et
// les migrations qui les transportent d'un schéma à l'autre.
//
// Architecture :
//   typeside   → les valeurs primitives (String, Int, Float, Bool, Record)
//   category   → la catégorie finie qui décrit la structure (= le "moule")
//   functor    → le foncteur entre catégories (= comment restructurer)
//   instance   → le foncteur Catégorie → Set (= les données concrètes)
//   migrate    → les opérations Δ, Σ, Π (= les migrations catégoriques)
//   adjunction → la vérification concrète de Σ ⊣ Δ ⊣ Π
//   validate   → les rapports de cohérence
//   error      → l'unique type d'erreur du moteur
//
// =============================================================================

pub mod typeside;
pub mod category;
pub mod functor;
pub mod instance;
pub mod migrate;
pub mod adjunction;
pub mod validate;
pub mod error;
