use classroom_cli::accounts::{NewAccount, create_account};
use classroom_cli::seeder::{self, SeedConfig};
use classroom_core::UserRole;
use classroom_db::{DatabaseConfig, init_db_pool, run_migrations};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "classroom-cli")]
#[command(about = "Classroom CLI - Administrative tools for the Classroom API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create an account with any role
    CreateUser {
        /// teacher, student or guest
        #[arg(short = 'r', long, default_value = "teacher")]
        role: UserRole,

        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(short = 'u', long)]
        username: Option<String>,

        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake teachers, classes, students and enrollments
    Seed {
        /// Number of teachers to create
        #[arg(short = 't', long, default_value = "5")]
        teachers: usize,

        /// Number of classes per teacher
        #[arg(short = 'c', long, default_value = "3")]
        classes: usize,

        /// Number of students to create
        #[arg(short = 's', long, default_value = "100")]
        students: usize,

        /// Number of classes each student joins
        #[arg(long, default_value = "3")]
        enrollments: usize,
    },
    /// Remove every seeded account and its classes and enrollments
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env().map_err(|_| "DATABASE_URL must be set")?;
    let pool = init_db_pool(&config).await?;

    match cli.command {
        Commands::Migrate => handle_migrate(&pool).await,
        Commands::CreateUser {
            role,
            email,
            username,
            first_name,
            last_name,
            password,
        } => {
            handle_create_user(&pool, role, email, username, first_name, last_name, password).await
        }
        Commands::Seed {
            teachers,
            classes,
            students,
            enrollments,
        } => {
            let config = SeedConfig::new(teachers)
                .with_classes_per_teacher(classes)
                .with_students(students)
                .with_enrollments_per_student(enrollments);
            handle_seed(&pool, config).await
        }
        Commands::ClearSeed => {
            seeder::clear_all(&pool).await?;
            Ok(())
        }
    }
}

async fn handle_migrate(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    run_migrations(pool).await?;
    println!("✅ Migrations applied");
    Ok(())
}

fn prompt(value: Option<String>, label: &str) -> Result<String, dialoguer::Error> {
    match value {
        Some(value) => Ok(value),
        None => Input::new().with_prompt(label).interact_text(),
    }
}

fn prompt_optional(value: Option<String>, label: &str) -> Result<String, dialoguer::Error> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text(),
    }
}

async fn handle_create_user(
    pool: &PgPool,
    role: UserRole,
    email: Option<String>,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = prompt(email, "Email address")?;
    let username = prompt(username, "Username")?;
    let first_name = prompt_optional(first_name, "First name")?;
    let last_name = prompt_optional(last_name, "Last name")?;

    let mut account = NewAccount {
        email,
        username,
        first_name,
        last_name,
        role,
        password: String::new(),
    };

    match password {
        Some(password) => account.password = password,
        None => loop {
            account.password = Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords don't match")
                .interact()?;
            match account.check_password() {
                Ok(()) => break,
                Err(problems) => {
                    for problem in problems {
                        eprintln!("   ⚠️  {}", problem);
                    }
                }
            }
        },
    }

    let id = create_account(pool, &account).await?;

    println!("\n✅ User created successfully!");
    println!("   ID: {}", id);
    println!("   Email: {}", account.email);
    println!("   Role: {}", account.role);
    Ok(())
}

async fn handle_seed(pool: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let summary = seeder::seed_all(pool, config).await?;
    println!(
        "   {} teachers, {} classes, {} students, {} enrollments",
        summary.teachers, summary.classes, summary.students, summary.enrollments
    );
    Ok(())
}
