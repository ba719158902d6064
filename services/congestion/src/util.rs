use std::path::Path;

/// Check that the string is a worker count of at least one
pub fn is_worker_count(count: String) -> Result<(), String> {
    match count.parse::<u32>() {
        Ok(0) => Err("Worker count must be at least 1".to_owned()),
        Ok(_) => Ok(()),
        Err(_) => Err("Invalid worker count".to_owned()),
    }
}

/// Check that the string is a 0-based rank
pub fn is_rank(rank: String) -> Result<(), String> {
    match rank.parse::<u32>() {
        Ok(_) => Ok(()),
        Err(_) => Err("Invalid rank".to_owned()),
    }
}

/// Check that the string is a report length of at least one
pub fn is_top_k(k: String) -> Result<(), String> {
    match k.parse::<usize>() {
        Ok(0) => Err("Report length must be at least 1".to_owned()),
        Ok(_) => Ok(()),
        Err(_) => Err("Invalid report length".to_owned()),
    }
}

/// Check that the file exists
pub fn is_file(file_str: String) -> Result<(), String> {
    let path = Path::new(&file_str);
    match path.is_file() {
        true => Ok(()),
        false => Err("Config file does not exist".to_owned()),
    }
}
