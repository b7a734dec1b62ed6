use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    api::{self, breeding::AgeThreshold},
    config::AppConfig,
    front::forms,
    models::{
        bird::{BirdStatus, Gender},
        incubation::IncubationStatus,
        sale::FollowUpStatus,
    },
    repo,
};

#[derive(Args, Debug, Clone)]
pub struct BirdArgs {
    #[arg(long)]
    breed: String,
    #[arg(long, value_enum, default_value_t = Gender::Unverified)]
    gender: Gender,
    /// YYYY-MM-DD
    #[arg(long)]
    birth_date: Option<NaiveDate>,
    #[arg(long)]
    ring_number: Option<String>,
    #[arg(long)]
    price: Option<Decimal>,
    /// Upper bound, turns the price into a range
    #[arg(long)]
    price_max: Option<Decimal>,
    #[arg(long, default_value = "")]
    health_notes: String,
}

impl From<&BirdArgs> for forms::bird::BirdForm {
    fn from(args: &BirdArgs) -> Self {
        forms::bird::BirdForm {
            breed: args.breed.clone(),
            gender: args.gender,
            birth_date: args.birth_date,
            ring_number: args.ring_number.clone(),
            price: args.price,
            price_max: args.price_max,
            health_notes: args.health_notes.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListBirdsArgs {
    #[arg(long, value_enum)]
    status: Option<BirdStatus>,
    #[arg(long, value_enum)]
    gender: Option<Gender>,
    #[arg(long)]
    breed: Option<String>,
    /// Matches ring number, breed and notes
    #[arg(short, long)]
    keyword: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = crate::consts::DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

#[derive(Subcommand, Clone, Debug)]
pub enum BirdsAction {
    List(ListBirdsArgs),
    Show {
        id: i64,
    },
    /// Prints the bird as an editable form
    Edit {
        id: i64,
    },
    Create(BirdArgs),
    Update {
        id: i64,
        #[command(flatten)]
        bird: BirdArgs,
    },
    /// Promotes an available bird to breeding stock
    Breed {
        id: i64,
    },
    /// Puts a returned bird back on sale
    Relist {
        id: i64,
    },
    /// Takes an unmated breeding or incubating bird back to sale
    Release {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum PhotosAction {
    List { bird_id: i64 },
    Add { bird_id: i64, file: std::path::PathBuf },
    Delete { bird_id: i64, photo_id: i64 },
}

#[derive(Args, Debug, Clone)]
pub struct SellArgs {
    id: i64,
    #[arg(long)]
    seller: String,
    #[arg(long)]
    buyer: String,
    #[arg(long)]
    price: Decimal,
    #[arg(long)]
    contact: String,
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Subcommand, Clone, Debug)]
pub enum FollowUpsAction {
    List {
        bird_id: i64,
    },
    Add {
        bird_id: i64,
        #[arg(long, value_enum, default_value_t = FollowUpStatus::Contacted)]
        status: FollowUpStatus,
        #[arg(long)]
        note: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct IncubationArgs {
    #[arg(long)]
    father: Option<i64>,
    #[arg(long)]
    mother: Option<i64>,
    /// Defaults to today
    #[arg(long)]
    start_date: Option<NaiveDate>,
    #[arg(long)]
    eggs: u32,
    #[arg(long, default_value = "")]
    notes: String,
}

impl IncubationArgs {
    fn to_form(&self, today: NaiveDate) -> forms::incubation::IncubationForm {
        forms::incubation::IncubationForm {
            father_id: self.father,
            mother_id: self.mother,
            start_date: Some(self.start_date.unwrap_or(today)),
            eggs_count: self.eggs,
            hatched_count: 0,
            notes: self.notes.clone(),
        }
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum IncubationsAction {
    List {
        #[arg(long, value_enum)]
        status: Option<IncubationStatus>,
    },
    Create(IncubationArgs),
    Update {
        id: i64,
        #[command(flatten)]
        incubation: IncubationArgs,
    },
    Hatch {
        id: i64,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        count: u32,
    },
    Fail {
        id: i64,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum ShareAction {
    Create {
        bird_id: i64,
        #[arg(long)]
        days: Option<u32>,
    },
    List {
        bird_id: i64,
    },
    Regenerate {
        bird_id: i64,
        #[arg(long)]
        days: Option<u32>,
    },
    Delete {
        link_id: i64,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum Action {
    #[command(subcommand)]
    Birds(BirdsAction),
    #[command(subcommand)]
    Photos(PhotosAction),
    Sell(SellArgs),
    Return {
        id: i64,
        #[arg(long)]
        reason: String,
    },
    #[command(subcommand)]
    FollowUps(FollowUpsAction),
    /// Lists the birds a breeding bird can be paired with
    Mates {
        id: i64,
        /// Only keep candidates old enough for this context
        #[arg(long, value_enum)]
        min_age: Option<AgeThreshold>,
    },
    Pair {
        first_id: i64,
        second_id: i64,
    },
    Unpair {
        id: i64,
        /// Confirms the couple should be split
        #[arg(long)]
        yes: bool,
    },
    /// Starts an incubation for a mated couple
    Incubate(IncubationArgs),
    #[command(subcommand)]
    Incubations(IncubationsAction),
    #[command(subcommand)]
    Share(ShareAction),
    Stats {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
}

/// Parrot shop console
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct AppArgs {
    /// Debug logs on stdout
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub action: Action,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

impl AppArgs {
    pub async fn run(&self, config: &AppConfig, repo: &repo::ImplAppRepo) -> anyhow::Result<()> {
        let today = config.today()?;
        let now = Utc::now();
        let share_days = |days: Option<u32>| forms::share::ShareLinkForm {
            valid_days: days.unwrap_or(config.share_link_default_days),
        };

        match &self.action {
            Action::Birds(action) => match action {
                BirdsAction::List(args) => {
                    let filter = forms::bird::BirdFilter {
                        status: args.status,
                        gender: args.gender,
                        breed: args.breed.clone(),
                        keyword: args.keyword.clone(),
                        page: args.page,
                        page_size: args.page_size,
                    };
                    print_json(&api::bird::list_birds(&filter, today, repo).await?)
                }
                BirdsAction::Show { id } => {
                    print_json(&api::bird::get_bird_detail(*id, today, now, repo).await?)
                }
                BirdsAction::Edit { id } => {
                    print_json(&api::bird::get_bird_to_edit(*id, repo).await?)
                }
                BirdsAction::Create(args) => {
                    print_json(&api::bird::create_bird(args.into(), today, repo).await?)
                }
                BirdsAction::Update { id, bird } => {
                    print_json(&api::bird::update_bird(*id, bird.into(), today, repo).await?)
                }
                BirdsAction::Breed { id } => print_json(&api::bird::set_breeding(*id, repo).await?),
                BirdsAction::Relist { id } => print_json(&api::bird::relist_bird(*id, repo).await?),
                BirdsAction::Release { id } => {
                    print_json(&api::bird::release_from_breeding(*id, repo).await?)
                }
                BirdsAction::Delete { id } => api::bird::delete_bird(*id, repo).await,
            },
            Action::Photos(action) => match action {
                PhotosAction::List { bird_id } => {
                    print_json(&api::photo::list_photos(*bird_id, repo).await?)
                }
                PhotosAction::Add { bird_id, file } => {
                    let upload = forms::photo::PhotoUpload {
                        filename: file
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_default(),
                        body: tokio::fs::read(file).await?,
                    };
                    print_json(&api::photo::add_photo(*bird_id, upload, repo).await?)
                }
                PhotosAction::Delete { bird_id, photo_id } => {
                    api::photo::delete_photo(*bird_id, *photo_id, repo).await
                }
            },
            Action::Sell(args) => {
                let form = forms::sale::SellForm {
                    seller: args.seller.clone(),
                    buyer_name: args.buyer.clone(),
                    price: Some(args.price),
                    contact: args.contact.clone(),
                    notes: args.notes.clone(),
                };
                print_json(&api::sale::sell_bird(args.id, form, now, repo).await?)
            }
            Action::Return { id, reason } => {
                let form = forms::sale::ReturnForm {
                    reason: reason.clone(),
                };
                print_json(&api::sale::return_bird(*id, form, now, repo).await?)
            }
            Action::FollowUps(action) => match action {
                FollowUpsAction::List { bird_id } => {
                    print_json(&api::sale::list_follow_ups(*bird_id, repo).await?)
                }
                FollowUpsAction::Add {
                    bird_id,
                    status,
                    note,
                } => {
                    let form = forms::sale::FollowUpForm {
                        status: *status,
                        note: note.clone(),
                    };
                    print_json(&api::sale::add_follow_up(*bird_id, form, repo).await?)
                }
            },
            Action::Mates { id, min_age } => {
                let mut mates = api::breeding::find_compatible_mates(*id, repo).await?;
                if let Some(threshold) = min_age {
                    mates = api::breeding::eligible_by_age(mates, today, *threshold);
                }
                print_json(&mates)
            }
            Action::Pair {
                first_id,
                second_id,
            } => api::breeding::pair_birds(*first_id, *second_id, repo).await,
            Action::Unpair { id, yes } => api::breeding::unpair_birds(*id, *yes, repo).await,
            Action::Incubate(args) => print_json(
                &api::breeding::start_incubation(args.to_form(today), today, repo).await?,
            ),
            Action::Incubations(action) => match action {
                IncubationsAction::List { status } => {
                    print_json(&api::incubation::list_incubations(*status, today, repo).await?)
                }
                IncubationsAction::Create(args) => print_json(
                    &api::incubation::create_incubation(args.to_form(today), today, repo).await?,
                ),
                IncubationsAction::Update { id, incubation } => print_json(
                    &api::incubation::update_incubation(
                        *id,
                        incubation.to_form(today),
                        today,
                        repo,
                    )
                    .await?,
                ),
                IncubationsAction::Hatch { id, date, count } => {
                    let form = forms::incubation::HatchForm {
                        actual_hatch_date: date.unwrap_or(today),
                        hatched_count: *count,
                    };
                    print_json(&api::incubation::record_hatch(*id, form, repo).await?)
                }
                IncubationsAction::Fail { id } => {
                    print_json(&api::incubation::mark_failed(*id, repo).await?)
                }
            },
            Action::Share(action) => match action {
                ShareAction::Create { bird_id, days } => print_json(
                    &api::share::create_share_link(*bird_id, share_days(*days), now, repo).await?,
                ),
                ShareAction::List { bird_id } => {
                    print_json(&api::share::list_share_links(*bird_id, now, repo).await?)
                }
                ShareAction::Regenerate { bird_id, days } => print_json(
                    &api::share::regenerate_share_link(*bird_id, share_days(*days), now, repo)
                        .await?,
                ),
                ShareAction::Delete { link_id } => {
                    api::share::delete_share_link(*link_id, repo).await
                }
            },
            Action::Stats { from, to } => {
                print_json(&api::stats::get_sales_stats(*from, *to, repo).await?)
            }
        }
    }
}
