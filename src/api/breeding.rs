//! # Breeding API Module
//!
//! Mate search, pairing/unpairing and the start of an incubation cycle.
//!
//! The backend keeps `mate_id` symmetric. Pairing is still verified by
//! reading both birds back, a one-sided pairing is reported as an error.

use chrono::NaiveDate;

use crate::{
    consts,
    front::{self, errors::UserError},
    metric,
    models::{
        self,
        bird::{Bird, BirdStatus, Gender},
    },
    repo,
};

/// Age contexts the shop has used for breeding eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AgeThreshold {
    /// Minimum age accepted in the pairing dialog
    Pairing,
    /// Minimum age for the breeding stock list
    BreedingList,
    /// Minimum age for a bird to be recorded as a parent
    Parent,
}

impl AgeThreshold {
    pub fn min_age_days(&self) -> i64 {
        match self {
            AgeThreshold::Pairing => consts::PAIRING_MIN_AGE_DAYS,
            AgeThreshold::BreedingList => consts::BREEDING_LIST_MIN_AGE_DAYS,
            AgeThreshold::Parent => consts::PARENT_MIN_AGE_DAYS,
        }
    }
}

/// Keeps the birds old enough for `threshold`, unknown birth dates pass.
pub fn eligible_by_age(birds: Vec<Bird>, today: NaiveDate, threshold: AgeThreshold) -> Vec<Bird> {
    let min_age_days = threshold.min_age_days();
    birds
        .into_iter()
        .filter(|bird| bird.is_old_enough(today, min_age_days))
        .collect()
}

/// Candidates a bird may be paired with: opposite gender, breeding and
/// unmated, never the bird itself.
pub fn filter_mate_candidates(bird: &Bird, candidates: Vec<Bird>) -> Vec<Bird> {
    let Some(wanted) = bird.gender.opposite() else {
        return vec![];
    };

    candidates
        .into_iter()
        .filter(|candidate| {
            candidate.id != bird.id && candidate.gender == wanted && candidate.is_open_for_pairing()
        })
        .collect()
}

/// Lists the birds `bird_id` could be paired with.
///
/// # Errors
/// - [`UserError::GenderUnverified`] when the bird's gender is unknown
/// - [`UserError::NotPairable`] when the bird is not breeding or already mated
pub async fn find_compatible_mates(
    bird_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<Vec<Bird>> {
    let bird = repo.get_bird(bird_id).await?;

    let Some(wanted) = bird.gender.opposite() else {
        return Err(UserError::GenderUnverified.into());
    };
    check_open_for_pairing(&bird)?;

    let candidates = repo.list_eligible_mates(wanted).await?;
    Ok(filter_mate_candidates(&bird, candidates))
}

/// A bird can take a mate when it is shown as breeding, `paired` being
/// derived from `mate_id`.
fn check_open_for_pairing(bird: &Bird) -> Result<(), UserError> {
    if bird.is_mated() {
        return Err(UserError::NotPairable(format!(
            "bird {} already has a mate",
            bird.id
        )));
    }
    if !bird.is_open_for_pairing() {
        return Err(UserError::NotPairable(format!(
            "bird {} is not breeding stock",
            bird.id
        )));
    }
    Ok(())
}

/// Local pairing rules, returns the request with the male first.
pub fn check_pairable(a: &Bird, b: &Bird) -> Result<models::bird::PairRequest, UserError> {
    if a.id == b.id {
        return Err(UserError::NotPairable("a bird cannot be paired with itself".into()));
    }

    check_open_for_pairing(a)?;
    check_open_for_pairing(b)?;

    match (a.gender, b.gender) {
        (Gender::Male, Gender::Female) => Ok(models::bird::PairRequest {
            male_id: a.id,
            female_id: b.id,
        }),
        (Gender::Female, Gender::Male) => Ok(models::bird::PairRequest {
            male_id: b.id,
            female_id: a.id,
        }),
        _ => Err(UserError::NotPairable(
            "a pair needs one male and one female".into(),
        )),
    }
}

/// Pairs two breeding birds.
///
/// Both birds are read concurrently and checked locally, then the backend
/// pairs them and the result is read back from both sides.
///
/// # Arguments
/// * `first_id`, `second_id` - Birds to pair, in any gender order
/// * `repo` - Backend repository
///
/// # Errors
/// - [`UserError::NotPairable`] when a local rule fails (nothing is sent)
/// - An error if the birds do not reference each other after the call
pub async fn pair_birds(
    first_id: i64,
    second_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<()> {
    let _span = logfire::span!("pair_birds").entered();

    let (first, second) = futures::try_join!(repo.get_bird(first_id), repo.get_bird(second_id))?;
    let request = check_pairable(&first, &second)?;

    repo.pair_birds(&request).await?;
    verify_pairing(request.male_id, request.female_id, repo).await?;

    metric::incr_bird_action_statds("pair");
    Ok(())
}

/// Reads both birds back and checks they reference each other.
pub async fn verify_pairing(
    male_id: i64,
    female_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<()> {
    let (male, female) = futures::try_join!(repo.get_bird(male_id), repo.get_bird(female_id))?;

    if male.mate_id == Some(female_id) && female.mate_id == Some(male_id) {
        return Ok(());
    }

    logfire::warn!(
        "asymmetric pairing between {male_id} and {female_id}",
        male_id = male_id,
        female_id = female_id
    );
    anyhow::bail!(
        "pairing of {male_id} and {female_id} is not symmetric (mates: {:?} / {:?})",
        male.mate_id,
        female.mate_id
    )
}

/// Breaks up a couple. The backend clears the mate on both birds.
///
/// # Errors
/// - [`UserError::ConfirmationRequired`] when `confirmed` is false
/// - [`UserError::NotMated`] when the bird has no mate
pub async fn unpair_birds(
    bird_id: i64,
    confirmed: bool,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<()> {
    if !confirmed {
        return Err(UserError::ConfirmationRequired.into());
    }

    let bird = repo.get_bird(bird_id).await?;
    if !bird.is_mated() {
        return Err(UserError::NotMated.into());
    }

    repo.unpair_bird(bird_id).await?;
    metric::incr_bird_action_statds("unpair");
    Ok(())
}

/// Starts an incubation cycle for a mated couple.
///
/// A single backend call moves both parents to incubating and creates the
/// record.
pub async fn start_incubation(
    incubation_info: front::forms::incubation::IncubationForm,
    today: NaiveDate,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<models::incubation::IncubationRecord> {
    let (Some(father_id), Some(mother_id)) = (incubation_info.father_id, incubation_info.mother_id)
    else {
        return Err(UserError::NotPairable(
            "starting an incubation needs both parents".into(),
        )
        .into());
    };

    let new_incubation = incubation_info.into_new_incubation(today)?;

    let (father, mother) = futures::try_join!(repo.get_bird(father_id), repo.get_bird(mother_id))?;
    if father.mate_id != Some(mother_id) || mother.mate_id != Some(father_id) {
        return Err(UserError::NotMated.into());
    }
    for parent in [&father, &mother] {
        if !parent.status.can_transition_to(&BirdStatus::Incubating) {
            return Err(UserError::InvalidTransition {
                from: parent.status,
                to: BirdStatus::Incubating,
            }
            .into());
        }
    }

    let record = repo.start_incubation(&new_incubation).await?;
    metric::incr_bird_action_statds("start_incubation");

    Ok(record)
}
