//! `amalsas` command line front end.
//!
//! Every command restores the stored session first. Commands that map to a
//! guarded page are checked against the route table and print the redirect
//! instead of calling the API.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::handlers::payment::CallbackListener;
use crate::models::{Campaign, CampaignListing, CampaignStatus, Donation, ProfileUpdate, User, VersionResponse};
use crate::services::api_client::{ApiClient, FilePart};
use crate::services::auth::{AuthService, SignUpForm};
use crate::services::campaign::{
    CREATE_FAILED, CampaignForm, CampaignService, DataSource, LOAD_FAILED, UPDATE_FAILED, progress,
};
use crate::services::donation::{DonationOutcome, DonationService};
use crate::services::guard::{self, RouteDecision};
use crate::services::profile::{ChangePasswordForm, ProfileService};
use crate::services::search::{self, KeywordTarget};
use crate::services::session::SessionStore;
use crate::services::token_store::FileTokenStore;
use crate::services::validation::password_strength;
use crate::utils::format::{excerpt, format_number, format_percent, format_rupiah, image_url};

#[derive(Parser, Debug)]
#[command(name = "amalsas")]
#[command(about = "Command line client for the AmalSAS.id donation platform", version)]
pub struct Cli {
    /// REST API root
    #[arg(long, global = true, env = "AMALSAS_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// File holding the persisted session token
    #[arg(long, global = true, env = "AMALSAS_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a donor account
    Signup(SignUpArgs),
    /// Sign in with an e-mail or username
    Signin {
        value: String,
        #[arg(long, env = "AMALSAS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Signout,
    /// Show the signed-in user
    Whoami,
    /// Request a password reset link
    ForgotPassword { email: String },
    /// Set a new password with a reset token
    ResetPassword {
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    #[command(subcommand)]
    Campaigns(CampaignCommand),
    /// Donate to a campaign through the hosted checkout
    Donate {
        campaign_id: i64,
        /// Amount in rupiah, `50000` or `50.000`
        amount: String,
        /// Wait for the gateway to redirect back to the local listener
        #[arg(long)]
        wait: bool,
    },
    #[command(subcommand)]
    Donations(DonationCommand),
    /// Search campaigns, pages and shortcuts
    Search { query: String },
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Check whether the current session may open a page
    Route { path: String },
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct SignUpArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "AMALSAS_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum CampaignCommand {
    /// Home page listing with platform totals
    List,
    Show { id: i64 },
    Filter {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    Create(CampaignArgs),
    Edit {
        id: i64,
        #[command(flatten)]
        fields: CampaignArgs,
    },
    Delete { id: i64 },
    /// Replace a campaign's photo
    UploadPhoto { id: i64, file: PathBuf },
}

/// Campaign form fields. On edit, omitted fields keep their current value.
#[derive(Args, Debug, Clone, Default)]
pub struct CampaignArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub details: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub start: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub target: Option<f64>,
    /// pendidikan, kesehatan, sosial, bencana or lainnya
    #[arg(long)]
    pub category: Option<String>,
    /// Category name when `--category lainnya`
    #[arg(long)]
    pub custom_category: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub cpocket: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum DonationCommand {
    /// Your donation history
    Mine,
    /// Every donation (admin)
    All,
    Summary,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Show,
    Edit {
        /// Full name, split at the first space into first and last name
        #[arg(long, conflicts_with_all = ["first_name", "last_name"])]
        name: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        gender: Option<String>,
    },
    Password {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Replace the profile photo. Without a file nothing changes.
    Photo { file: Option<PathBuf> },
}

impl Command {
    /// Page a command corresponds to, for commands behind the route guard
    pub fn guarded_path(&self) -> Option<String> {
        match self {
            Command::Campaigns(CampaignCommand::Create(_)) => Some("/admin/campaigns/add".into()),
            Command::Campaigns(CampaignCommand::Edit { id, .. })
            | Command::Campaigns(CampaignCommand::UploadPhoto { id, .. }) => {
                Some(format!("/admin/campaigns/edit/{id}"))
            }
            Command::Campaigns(CampaignCommand::Delete { .. })
            | Command::Donations(DonationCommand::All) => Some("/admin/dashboard".into()),
            Command::Donations(DonationCommand::Mine) => Some("/history".into()),
            Command::Profile(_) => Some("/profile".into()),
            _ => None,
        }
    }
}

/// Services wired to one API client and the persisted session
pub struct Context {
    pub config: ClientConfig,
    pub session: SessionStore,
    pub auth: AuthService,
    pub campaigns: CampaignService,
    pub donations: DonationService,
    pub profile: ProfileService,
}

impl Context {
    pub fn new(config: ClientConfig, session: SessionStore) -> ClientResult<Self> {
        let api = ApiClient::new(&config.api_base_url, config.http.clone(), None)?;
        Ok(Self {
            auth: AuthService::new(api.clone()),
            campaigns: CampaignService::new(api.clone()),
            donations: DonationService::new(api.clone(), config.payment.clone()),
            profile: ProfileService::new(api),
            config,
            session,
        })
    }
}

/// Entry point used by the binary
pub async fn run(cli: Cli) -> ClientResult<()> {
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_base_url {
        config.api_base_url = url;
    }
    if let Some(path) = cli.token_file {
        config.token_file = path;
    }

    let session = SessionStore::new(Box::new(FileTokenStore::new(config.token_file.clone())));
    let mut ctx = Context::new(config, session)?;
    execute(&mut ctx, cli.command).await
}

/// Bootstrap the session, apply the guard, then run `command`
pub async fn execute(ctx: &mut Context, command: Command) -> ClientResult<()> {
    let restored = ctx.auth.check_auth(&mut ctx.session).await?;
    debug!(restored, "Session bootstrap finished");

    if let Some(path) = command.guarded_path() {
        if let RouteDecision::Redirect(target) = guard::authorize(&path, ctx.session.state()) {
            println!("Akses ke {path} ditolak, dialihkan ke {target}");
            return Err(match target {
                guard::HOME => ClientError::NotSignedIn,
                guard::PROFILE => ClientError::AdminRequired,
                _ => ClientError::NotFound(path),
            });
        }
    }

    match command {
        Command::Signup(args) => {
            let form = SignUpForm {
                first_name: args.first_name,
                last_name: args.last_name,
                username: args.username,
                phone: args.phone,
                address: args.address,
                email: args.email,
                password: args.password,
            };
            println!("Kekuatan password: {}", password_strength(&form.password));
            let message = ctx.auth.sign_up(&form).await?;
            println!("{message}");
        }
        Command::Signin { value, password } => {
            let user = ctx
                .auth
                .sign_in(&mut ctx.session, &value, &password)
                .await
                .map_err(|e| e.or_fallback("Login failed"))?;
            println!("Selamat datang, {}!", user.display_name());
        }
        Command::Signout => {
            ctx.auth.sign_out(&mut ctx.session)?;
            println!("Anda telah keluar.");
        }
        Command::Whoami => match &ctx.session.state().user {
            Some(user) if ctx.session.state().is_login => print_user(user),
            _ => println!("Belum masuk."),
        },
        Command::ForgotPassword { email } => {
            ctx.auth.forgot_password(&email).await?;
            println!("Link reset password telah dikirim ke {email}.");
        }
        Command::ResetPassword {
            token,
            password,
            confirm,
        } => {
            if !ctx.auth.verify_reset_token(&token).await? {
                println!("Token reset tidak valid atau sudah kedaluwarsa.");
                return Err(ClientError::NotFound("Reset token".to_string()));
            }
            ctx.auth.reset_password(&token, &password, &confirm).await?;
            println!("Password berhasil diubah. Silakan masuk.");
        }
        Command::Campaigns(command) => campaigns(ctx, command).await?,
        Command::Donate {
            campaign_id,
            amount,
            wait,
        } => donate(ctx, campaign_id, &amount, wait).await?,
        Command::Donations(command) => donations(ctx, command).await?,
        Command::Search { query } => {
            let listing = ctx.campaigns.list().await;
            match search::search(&query, &listing.value.campaigns, ctx.session.state()) {
                Some(results) if !results.is_empty() => {
                    for campaign in &results.campaigns {
                        println!("[campaign] #{} {}", campaign.id, campaign.title);
                    }
                    for page in &results.pages {
                        println!("[halaman] {} ({})", page.title, page.path);
                    }
                    for keyword in &results.keywords {
                        let target = match keyword.target {
                            KeywordTarget::Navigation(path) => path.to_string(),
                            KeywordTarget::Action(action) => format!("{action:?}"),
                        };
                        println!("[pintasan] {} -> {target}", keyword.title);
                    }
                }
                Some(_) => println!("Tidak ada hasil untuk \"{query}\"."),
                None => println!("Masukkan kata kunci pencarian."),
            }
        }
        Command::Profile(command) => profile(ctx, command).await?,
        Command::Route { path } => match guard::authorize(&path, ctx.session.state()) {
            RouteDecision::Allow { route, params } => {
                println!("{} [{}] diizinkan: {}", route.pattern, route.tier, route.title);
                for (name, value) in params {
                    println!("  {name} = {value}");
                }
            }
            RouteDecision::Redirect(target) => println!("dialihkan ke {target}"),
        },
        Command::Version => {
            let version = VersionResponse::current();
            println!(
                "amalsas {} (commit {}, built {})",
                version.version, version.commit, version.build_time
            );
        }
    }
    Ok(())
}

async fn campaigns(ctx: &Context, command: CampaignCommand) -> ClientResult<()> {
    match command {
        CampaignCommand::List => {
            let listing = ctx.campaigns.list().await;
            print!("{}", render_listing(&listing.value, listing.source));
        }
        CampaignCommand::Show { id } => {
            let campaign = ctx.campaigns.get(id).await?;
            print_campaign(&campaign.value, &ctx.config.image_base_url);
            if campaign.source == DataSource::Backend {
                let donations = ctx.campaigns.donations(id).await.unwrap_or_default();
                println!("Donatur: {}", donations.len());
            }
        }
        CampaignCommand::Filter { category, location } => {
            let found = ctx
                .campaigns
                .filter(category.as_deref(), location.as_deref())
                .await?;
            if found.is_empty() {
                println!("Tidak ada campaign yang cocok.");
            }
            for campaign in &found {
                println!("{}", listing_line(campaign));
            }
        }
        CampaignCommand::Create(fields) => {
            let mut form = CampaignForm::default();
            fields.apply(&mut form)?;
            let campaign = ctx
                .campaigns
                .create(&form)
                .await
                .map_err(|e| e.or_fallback(CREATE_FAILED))?;
            println!("Campaign #{} dibuat.", campaign.id);
            println!("-> /admin/dashboard");
        }
        CampaignCommand::Edit { id, fields } => {
            let mut form = ctx
                .campaigns
                .edit_form(id)
                .await
                .map_err(|e| e.or_fallback(LOAD_FAILED))?;
            fields.apply(&mut form)?;
            ctx.campaigns
                .update(id, &form)
                .await
                .map_err(|e| e.or_fallback(UPDATE_FAILED))?;
            println!("Campaign #{id} diperbarui.");
            println!("-> /admin/dashboard");
        }
        CampaignCommand::Delete { id } => {
            ctx.campaigns.delete(id).await?;
            println!("Campaign #{id} dihapus.");
        }
        CampaignCommand::UploadPhoto { id, file } => {
            let photo = read_file("photo", &file)?;
            ctx.campaigns.upload_photo(id, photo).await?;
            println!("Foto campaign #{id} diperbarui.");
        }
    }
    Ok(())
}

async fn donate(ctx: &Context, campaign_id: i64, amount: &str, wait: bool) -> ClientResult<()> {
    let checkout = match ctx
        .donations
        .initiate(ctx.session.state(), campaign_id, amount)
        .await?
    {
        DonationOutcome::SignInRequired => {
            println!("Silakan masuk untuk berdonasi.");
            return Err(ClientError::NotSignedIn);
        }
        DonationOutcome::Checkout(checkout) => checkout,
    };

    println!(
        "Donasi {} untuk campaign #{campaign_id} dibuat (order {}).",
        format_rupiah(checkout.donation.amount),
        checkout.donation.order_id
    );
    println!("Lanjutkan pembayaran di: {}", checkout.checkout_url);

    if !wait {
        return Ok(());
    }

    let payment = &ctx.config.payment;
    let listener = CallbackListener::start(&payment.callback_bind).map_err(|e| {
        ClientError::Callback(format!("cannot bind {}: {e}", payment.callback_bind))
    })?;
    println!("Menunggu hasil pembayaran di {} ...", listener.finish_url());
    let result = listener
        .wait(Duration::from_secs(payment.callback_timeout_seconds))
        .await?;
    info!(outcome = ?result.outcome, "Payment finished");
    println!("{}", result.outcome.navigation());
    Ok(())
}

async fn donations(ctx: &Context, command: DonationCommand) -> ClientResult<()> {
    match command {
        DonationCommand::Mine => {
            let donations = ctx.donations.my_donations(ctx.session.state()).await?;
            print_donations(&donations);
        }
        DonationCommand::All => {
            let donations = ctx.donations.all_donations().await?;
            print_donations(&donations);
        }
        DonationCommand::Summary => {
            let summary = ctx.donations.summary().await?;
            println!("Total Transaksi: {}", format_number(summary.total_transactions as f64));
            println!("Total Donasi: {}", format_rupiah(summary.total_amount));
        }
    }
    Ok(())
}

async fn profile(ctx: &mut Context, command: ProfileCommand) -> ClientResult<()> {
    match command {
        ProfileCommand::Show => {
            let user = ctx.profile.fetch_profile(&ctx.session).await?;
            print_user(&user);
            println!("Foto: {}", image_url(&ctx.config.image_base_url, &user.photo));
        }
        ProfileCommand::Edit {
            name,
            first_name,
            last_name,
            email,
            phone,
            address,
            gender,
        } => {
            let current = ctx
                .session
                .state()
                .user
                .clone()
                .ok_or(ClientError::NotSignedIn)?;
            let mut update = ProfileUpdate::from_user(&current);
            if let Some(name) = name {
                update.set_name(&name);
            }
            overwrite(&mut update.first_name, first_name);
            overwrite(&mut update.last_name, last_name);
            overwrite(&mut update.email, email);
            overwrite(&mut update.phone, phone);
            overwrite(&mut update.address, address);
            overwrite(&mut update.gender, gender);

            let user = ctx.profile.update_profile(&mut ctx.session, &update).await?;
            println!("Profil {} diperbarui.", user.display_name());
        }
        ProfileCommand::Password { old, new, confirm } => {
            let form = ChangePasswordForm {
                old_password: old,
                new_password: new,
                confirm_new_password: confirm,
            };
            ctx.profile.change_password(&form).await?;
            println!("Password berhasil diubah.");
        }
        ProfileCommand::Photo { file } => {
            let photo = file.as_deref().map(|path| read_file("photo", path)).transpose()?;
            match ctx.profile.change_image(&mut ctx.session, photo).await? {
                Some(_) => println!("Foto profil diperbarui."),
                None => println!("Tidak ada file dipilih."),
            }
        }
    }
    Ok(())
}

impl CampaignArgs {
    fn apply(self, form: &mut CampaignForm) -> ClientResult<()> {
        overwrite(&mut form.title, self.title);
        overwrite(&mut form.description, self.description);
        overwrite(&mut form.details, self.details);
        overwrite(&mut form.start, self.start);
        overwrite(&mut form.end, self.end);
        overwrite(&mut form.category, self.category);
        overwrite(&mut form.custom_category, self.custom_category);
        overwrite(&mut form.location, self.location);
        overwrite(&mut form.cpocket, self.cpocket);
        if let Some(target) = self.target {
            form.target_total = target;
        }
        if let Some(status) = self.status {
            form.status = CampaignStatus::from(status);
        }
        if let Some(path) = self.photo {
            form.photo = Some(read_file("photo", &path)?);
        }
        Ok(())
    }
}

fn overwrite(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn read_file(field: &str, path: &Path) -> ClientResult<FilePart> {
    FilePart::from_path(field, path).map_err(|source| ClientError::File {
        path: path.display().to_string(),
        source,
    })
}

/// Home page listing as printed by `campaigns list`
pub fn render_listing(listing: &CampaignListing, source: DataSource) -> String {
    let mut out = String::new();
    if source == DataSource::Placeholder {
        out.push_str("(data contoh, server tidak tersedia)\n");
    }
    out.push_str(&format!(
        "Total Campaign: {}\n",
        format_number(listing.total_campaigns as f64)
    ));
    out.push_str(&format!(
        "Donasi Terkumpul: {}\n",
        format_rupiah(listing.total_collected)
    ));
    out.push_str(&format!(
        "Total Transaksi: {}\n",
        format_number(listing.total_transactions as f64)
    ));
    for campaign in &listing.campaigns {
        out.push_str(&listing_line(campaign));
        out.push('\n');
    }
    out
}

fn listing_line(campaign: &Campaign) -> String {
    let figures = progress(campaign, Utc::now());
    format!(
        "#{:<4} {} | {} terkumpul ({}) | {} hari lagi | {}",
        campaign.id,
        excerpt(&campaign.title, 40),
        format_rupiah(figures.collected),
        format_percent(figures.percent),
        figures.remaining_days,
        campaign.status
    )
}

fn print_campaign(campaign: &Campaign, image_base_url: &str) {
    let figures = progress(campaign, Utc::now());
    println!("#{} {}", campaign.id, campaign.title);
    println!("{}", campaign.description);
    if !campaign.details.is_empty() {
        println!("{}", campaign.details);
    }
    println!("Penggalang: {}", campaign.organiser());
    println!(
        "Terkumpul: {} dari {} ({})",
        format_rupiah(figures.collected),
        format_rupiah(figures.target),
        format_percent(figures.percent)
    );
    println!("Sisa hari: {}", figures.remaining_days);
    println!("Status: {}", campaign.status);
    println!("Gambar: {}", image_url(image_base_url, &campaign.photo));
}

fn print_user(user: &User) {
    println!("{} (@{})", user.display_name(), user.username);
    println!("Email: {}", user.email);
    if !user.phone.is_empty() {
        println!("Telepon: {}", user.phone);
    }
    println!("Admin: {}", if user.is_admin { "ya" } else { "tidak" });
}

fn print_donations(donations: &[Donation]) {
    if donations.is_empty() {
        println!("Belum ada donasi.");
        return;
    }
    for donation in donations {
        println!(
            "{} | {} | {} | {}",
            donation.order_id,
            donation.campaign_title().unwrap_or("-"),
            format_rupiah(donation.amount),
            donation.status
        );
    }
}
