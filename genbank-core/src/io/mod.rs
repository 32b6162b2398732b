pub mod genbank;
