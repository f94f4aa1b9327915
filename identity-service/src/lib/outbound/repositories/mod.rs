pub mod doctor;
pub mod identity;
pub mod memory;

pub use doctor::PostgresDoctorDirectory;
pub use identity::PostgresIdentityRepository;
pub use memory::InMemoryDoctorDirectory;
pub use memory::InMemoryIdentityRepository;
