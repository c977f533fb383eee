mod analysis_sessions;
