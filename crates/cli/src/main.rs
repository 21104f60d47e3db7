use std::path::PathBuf;

use api_shared::ReportRes;
use clap::{Parser, Subcommand};
use clinic_core::config::database_path_from_env_value;
use clinic_core::validation::validate_facility;
use clinic_core::{CoreConfig, DoctorService, FacilityId, FacilityService, PatientService, Store};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic records administration CLI")]
struct Cli {
    /// SQLite database file (default: $CLINIC_DATABASE_PATH, then clinic.db)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database file and apply migrations
    Init,
    /// Create a facility
    CreateFacility {
        /// Facility name (must be unique)
        name: String,
        /// Street address
        address: String,
        /// Contact phone number
        phone: String,
    },
    /// List facilities with patient and doctor counts
    ListFacilities,
    /// Register a doctor and print their API key
    AddDoctor {
        /// Login name (letters, digits and @.+-_)
        username: String,
        /// Contact email
        email: String,
    },
    /// List registered doctors
    ListDoctors,
    /// Add a doctor to a facility's doctor set
    AssignDoctor {
        /// Facility id
        facility_id: i64,
        /// Doctor username
        username: String,
    },
    /// Print a facility's patient risk report as JSON
    Report {
        /// Facility id
        facility_id: i64,
    },
}

fn open_store(database: Option<PathBuf>) -> Result<Store, Box<dyn std::error::Error>> {
    let path = database.unwrap_or_else(|| {
        database_path_from_env_value(std::env::var("CLINIC_DATABASE_PATH").ok())
    });
    let cfg = CoreConfig::new(path)?;
    Ok(Store::open(cfg.database_path())?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'clinic --help' for commands");
        return Ok(());
    };

    let store = open_store(cli.database)?;

    match command {
        Commands::Init => {
            println!("Database ready.");
        }
        Commands::CreateFacility {
            name,
            address,
            phone,
        } => {
            let facility =
                FacilityService::new(store).create(validate_facility(&name, &address, &phone)?)?;
            println!("Created facility {} with ID: {}", facility.name, facility.id);
        }
        Commands::ListFacilities => {
            let summaries = FacilityService::new(store).list_with_counts()?;
            if summaries.is_empty() {
                println!("No facilities found.");
            } else {
                for s in summaries {
                    println!(
                        "ID: {}, Name: {}, Patients: {}, Doctors: {}",
                        s.facility.id, s.facility.name, s.patient_count, s.doctor_count
                    );
                }
            }
        }
        Commands::AddDoctor { username, email } => {
            let registered = DoctorService::new(store).register(&username, &email)?;
            println!(
                "Registered doctor {} with ID: {}",
                registered.doctor.username, registered.doctor.id
            );
            println!("API key (shown once): {}", registered.api_key);
        }
        Commands::ListDoctors => {
            let doctors = DoctorService::new(store).list()?;
            if doctors.is_empty() {
                println!("No doctors found.");
            } else {
                for doctor in doctors {
                    println!(
                        "ID: {}, Username: {}, Email: {}",
                        doctor.id, doctor.username, doctor.email
                    );
                }
            }
        }
        Commands::AssignDoctor {
            facility_id,
            username,
        } => {
            let facility_id = FacilityId::new(facility_id);
            if FacilityService::new(store).assign_doctor(facility_id, &username)? {
                println!("Assigned {} to facility {}", username, facility_id);
            } else {
                println!("{} is already a doctor at facility {}", username, facility_id);
            }
        }
        Commands::Report { facility_id } => {
            let report = PatientService::new(store).report(FacilityId::new(facility_id))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&ReportRes::from(report))?
            );
        }
    }

    Ok(())
}
