/*
 * This file is part of Browserprint.
 *
 * Copyright (C) 2025 Browserprint contributors
 *
 * Browserprint is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Browserprint is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Browserprint. If not, see <https://www.gnu.org/licenses/>.
 */

//! Browserprint - browser fingerprint collection
//!
//! Command line front end for `bp-core`: settings, logging, output
//! rendering and payload upload.

pub mod cli;
pub mod config;
pub mod logger;
pub mod output;
pub mod upload;
