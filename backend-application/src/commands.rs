// Write-side application services

pub mod refresh_commands;
